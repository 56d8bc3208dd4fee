/// Audio analysis constants and defaults
/// Separated from the renderer palette for better organization

/// Default FFT analysis window (2048 gives ~21.5Hz resolution at 44.1kHz)
pub const DEFAULT_TRANSFORM_SIZE: usize = 2048;

/// Default hop between analysis windows (50% overlap)
pub const DEFAULT_HOP_SIZE: usize = DEFAULT_TRANSFORM_SIZE / 2;

/// Ring buffer holds this many transform windows
pub const RING_CAPACITY_FACTOR: usize = 4;

/// Exponential smoothing factor for the display spectrum
/// Higher = more responsive, lower = smoother
pub const SMOOTHING_FACTOR: f32 = 0.3;

/// Per-subscriber queue depth: 1 replayed frame + 2 extra buffered frames
pub const SUBSCRIBER_CAPACITY: usize = 3;

/// Pre-allocated frames recycled by the audio thread
pub const FRAME_POOL_SIZE: usize = 8;

/// Samples kept for oscilloscope-style display
pub const WAVEFORM_SIZE: usize = 1024;

/// Bytes per encoded sample
pub const PCM16_BYTES: usize = 2;
pub const PCM_FLOAT_BYTES: usize = 4;

/// How often the audio thread is allowed to log repeated failures
/// (once per this many occurrences)
pub const LOG_EVERY_N_FAILURES: u32 = 500;

/// Default poll interval for the smoothing worker (~120 updates per second)
pub const SMOOTHING_POLL_INTERVAL_MS: u64 = 8;

/// Default number of bars for bar-style renderers
pub const DEFAULT_BAR_COUNT: usize = 64;
