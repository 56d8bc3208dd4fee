use crate::audio::constants;
use crate::audio::window_functions::WindowType;
use crate::error::ConfigError;

/// Analyzer settings, fixed for the lifetime of a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Samples per FFT (frequency resolution)
    pub transform_size: usize,
    /// Samples advanced between consecutive windows (overlap = transform - hop)
    pub hop_size: usize,
    /// Ring buffer capacity in multiples of `transform_size`
    pub ring_capacity_factor: usize,
    /// Exponential smoothing factor α in (0, 1]
    pub smoothing_factor: f32,
    /// Frames buffered per subscriber before the oldest is dropped
    pub subscriber_capacity: usize,
    /// Frames pre-allocated for the audio thread
    pub frame_pool_size: usize,
    pub window: WindowType,
    /// Publish raw mono blocks for oscilloscope-style consumers
    pub waveform_enabled: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            transform_size: constants::DEFAULT_TRANSFORM_SIZE,
            hop_size: constants::DEFAULT_HOP_SIZE,
            ring_capacity_factor: constants::RING_CAPACITY_FACTOR,
            smoothing_factor: constants::SMOOTHING_FACTOR,
            subscriber_capacity: constants::SUBSCRIBER_CAPACITY,
            frame_pool_size: constants::FRAME_POOL_SIZE,
            window: WindowType::Hann,
            waveform_enabled: true,
        }
    }
}

impl AnalyzerConfig {
    /// Transform size with the standard 50% overlap
    pub fn with_transform_size(mut self, transform_size: usize) -> Self {
        self.transform_size = transform_size;
        self.hop_size = transform_size / 2;
        self
    }

    pub fn with_hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = hop_size;
        self
    }

    pub fn with_ring_capacity_factor(mut self, factor: usize) -> Self {
        self.ring_capacity_factor = factor;
        self
    }

    pub fn with_smoothing_factor(mut self, alpha: f32) -> Self {
        self.smoothing_factor = alpha;
        self
    }

    pub fn with_subscriber_capacity(mut self, capacity: usize) -> Self {
        self.subscriber_capacity = capacity;
        self
    }

    pub fn with_frame_pool_size(mut self, size: usize) -> Self {
        self.frame_pool_size = size;
        self
    }

    pub fn with_window(mut self, window: WindowType) -> Self {
        self.window = window;
        self
    }

    pub fn with_waveform(mut self, enabled: bool) -> Self {
        self.waveform_enabled = enabled;
        self
    }

    pub fn ring_capacity(&self) -> usize {
        self.transform_size * self.ring_capacity_factor
    }

    pub fn bins(&self) -> usize {
        self.transform_size / 2
    }

    /// Enforces `1 <= hop <= transform` and a ring of at least two transforms
    ///
    /// Two transforms hold the `< transform` samples left after a hop loop
    /// plus one full decode chunk, so oversized callbacks never evict.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transform_size < 4 || self.transform_size % 2 != 0 {
            return Err(ConfigError::TransformSize(self.transform_size));
        }
        if self.hop_size == 0 || self.hop_size > self.transform_size {
            return Err(ConfigError::HopSize {
                hop_size: self.hop_size,
                transform_size: self.transform_size,
            });
        }
        if self.ring_capacity_factor < 2 {
            return Err(ConfigError::RingCapacity(self.ring_capacity_factor));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(ConfigError::SmoothingFactor(self.smoothing_factor));
        }
        if self.subscriber_capacity == 0 {
            return Err(ConfigError::SubscriberCapacity);
        }
        if self.frame_pool_size == 0 {
            return Err(ConfigError::FramePool);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.transform_size, 2048);
        assert_eq!(config.hop_size, 1024);
        assert_eq!(config.ring_capacity(), 8192);
        assert_eq!(config.bins(), 1024);
    }

    #[test]
    fn rejects_bad_sizes() {
        let odd = AnalyzerConfig::default().with_transform_size(1023);
        assert_eq!(odd.validate(), Err(ConfigError::TransformSize(1023)));

        let big_hop = AnalyzerConfig::default().with_hop_size(4096);
        assert!(matches!(big_hop.validate(), Err(ConfigError::HopSize { .. })));

        let zero_hop = AnalyzerConfig::default().with_hop_size(0);
        assert!(zero_hop.validate().is_err());

        let no_ring = AnalyzerConfig::default().with_ring_capacity_factor(0);
        assert_eq!(no_ring.validate(), Err(ConfigError::RingCapacity(0)));

        let single = AnalyzerConfig::default().with_ring_capacity_factor(1);
        assert_eq!(single.validate(), Err(ConfigError::RingCapacity(1)));
        assert!(AnalyzerConfig::default()
            .with_ring_capacity_factor(2)
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_bad_smoothing_factor() {
        for alpha in [0.0, -0.1, 1.5, f32::NAN] {
            let config = AnalyzerConfig::default().with_smoothing_factor(alpha);
            assert!(config.validate().is_err(), "alpha {alpha} accepted");
        }
        assert!(AnalyzerConfig::default()
            .with_smoothing_factor(1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn transform_size_setter_keeps_half_overlap() {
        let config = AnalyzerConfig::default().with_transform_size(512);
        assert_eq!(config.hop_size, 256);
        assert!(config.validate().is_ok());
    }
}
