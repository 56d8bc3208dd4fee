use thiserror::Error;

/// Rejected analyzer configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("transform size must be even and at least 4, got {0}")]
    TransformSize(usize),
    #[error("hop size must be in 1..={transform_size}, got {hop_size}")]
    HopSize { hop_size: usize, transform_size: usize },
    #[error("ring capacity factor must be at least 2, got {0}")]
    RingCapacity(usize),
    #[error("smoothing factor must be in (0, 1], got {0}")]
    SmoothingFactor(f32),
    #[error("subscriber capacity must be at least 1")]
    SubscriberCapacity,
    #[error("frame pool must hold at least 1 frame")]
    FramePool,
}

/// Failure while handling a single audio callback.
///
/// These never leave [`crate::audio::processor::FrameProcessor::ingest`]: the
/// callback logs them and returns so playback is never interrupted.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("declared length {declared} exceeds buffer of {actual} bytes")]
    Malformed { declared: usize, actual: usize },
    #[error("analysis block must hold {expected} samples, got {actual}")]
    BlockSize { expected: usize, actual: usize },
    #[error("unsupported stream format: {0}")]
    UnsupportedFormat(String),
    #[error("FFT failed: {0}")]
    Fft(#[from] realfft::FftError),
}
