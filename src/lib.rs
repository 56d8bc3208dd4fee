//! Real-time audio spectrum analysis
//!
//! Raw PCM from a playback engine's render callback goes in through
//! [`FrameProcessor`]; windowed, normalised spectra come out through a
//! bounded, drop-oldest [`FrameBus`] and a temporally smoothed
//! [`SmoothedFrameReader`]. Nothing on the audio side allocates, locks or
//! blocks once the pipeline is built.

pub mod audio;
pub mod config;
pub mod error;
pub mod ui;

pub use audio::display_utils::{apply_log_scale, downsample_magnitudes, log_scale};
pub use audio::format::{AudioFormat, Encoding};
pub use audio::frame_bus::{FrameBus, FramePublisher, FrameSink, FrameSubscription};
pub use audio::processor::{FrameProcessor, ProcessorStats};
pub use audio::smoothing::{SmoothedFrameReader, SmoothingEngine, SmoothingWorker};
pub use audio::spectrum::SpectrumFrame;
pub use audio::waveform::WaveformOutput;
pub use config::AnalyzerConfig;
pub use error::{ConfigError, IngestError};

/// Every piece of a wired analyser
///
/// Hand `processor` to the audio thread, run `smoothing` on a worker (see
/// [`SmoothingEngine::spawn`]) and give `smoothed`, `frames` or `waveform`
/// to display code.
pub struct Pipeline {
    pub processor: FrameProcessor<FramePublisher>,
    /// Raw per-hop frames for low-latency consumers
    pub frames: FrameBus,
    pub smoothing: SmoothingEngine,
    pub smoothed: SmoothedFrameReader,
    pub waveform: Option<WaveformOutput>,
}

pub fn create_pipeline(config: AnalyzerConfig) -> Result<Pipeline, ConfigError> {
    config.validate()?;

    let (publisher, frames) =
        audio::frame_bus::create_frame_channels(config.subscriber_capacity);
    let mut processor = FrameProcessor::new(&config, publisher)?;
    let waveform = config
        .waveform_enabled
        .then(|| processor.attach_waveform_tap());

    let smoothing = SmoothingEngine::new(frames.subscribe(), config.smoothing_factor);
    let smoothed = smoothing.reader();

    log::info!(
        "Spectrum pipeline ready: transform {} / hop {}, {} bins, window {:?}",
        config.transform_size,
        config.hop_size,
        config.bins(),
        config.window
    );

    Ok(Pipeline {
        processor,
        frames,
        smoothing,
        smoothed,
        waveform,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_rejected_before_wiring() {
        let config = AnalyzerConfig::default().with_hop_size(0);
        assert!(create_pipeline(config).is_err());
    }

    #[test]
    fn default_pipeline_subscribes_smoothing_engine() {
        let pipeline = create_pipeline(AnalyzerConfig::default()).unwrap();
        assert_eq!(pipeline.frames.subscriber_count(), 1);
        assert!(pipeline.waveform.is_some());
        assert!(pipeline.smoothed.latest().is_empty());
        assert!(!pipeline.processor.is_active());
    }
}
