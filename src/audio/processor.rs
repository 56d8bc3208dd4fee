use crate::audio::constants::LOG_EVERY_N_FAILURES;
use crate::audio::fft_engine::SpectrumTransform;
use crate::audio::format::{AudioFormat, PcmDecoder};
use crate::audio::frame_bus::FrameSink;
use crate::audio::ring_buffer::RingBuffer;
use crate::audio::spectrum::{now_ms, FramePool};
use crate::audio::waveform::{WaveformOutput, WaveformTap};
use crate::config::AnalyzerConfig;
use crate::error::{ConfigError, IngestError};
use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters updated by the audio thread, readable from anywhere
#[derive(Debug, Default)]
pub struct ProcessorStats {
    frames_published: AtomicU64,
    frames_rejected: AtomicU64,
    callbacks_failed: AtomicU64,
    pool_fallbacks: AtomicU64,
}

impl ProcessorStats {
    pub fn frames_published(&self) -> u64 {
        self.frames_published.load(Ordering::Relaxed)
    }

    /// Frames discarded for containing NaN or infinite values
    pub fn frames_rejected(&self) -> u64 {
        self.frames_rejected.load(Ordering::Relaxed)
    }

    pub fn callbacks_failed(&self) -> u64 {
        self.callbacks_failed.load(Ordering::Relaxed)
    }

    /// Frames that had to be allocated because the pool was exhausted
    pub fn pool_fallbacks(&self) -> u64 {
        self.pool_fallbacks.load(Ordering::Relaxed)
    }
}

/// Per-callback ingestion: decode, downmix, accumulate and analyse every hop
///
/// Lives on the audio render thread. After construction nothing here
/// allocates, locks or blocks; finished frames go to the [`FrameSink`]
/// which must be non-blocking too.
pub struct FrameProcessor<S: FrameSink> {
    sink: S,
    decoder: PcmDecoder,
    ring_buffer: RingBuffer,
    transform: SpectrumTransform,

    /// Unwindowed copy of the current analysis window
    analysis_block: Vec<f32>,
    frame_pool: FramePool,
    waveform: Option<WaveformTap>,

    /// Latest raw RMS, lock-free for meter-style readers
    loudness: Arc<AtomicF32>,
    stats: Arc<ProcessorStats>,

    transform_size: usize,
    hop_size: usize,
    active: bool,

    // Rate limiting for logs emitted from the audio thread
    failure_log_counter: u32,
    rejected_log_counter: u32,
}

impl<S: FrameSink> FrameProcessor<S> {
    pub fn new(config: &AnalyzerConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let transform_size = config.transform_size;
        Ok(Self {
            sink,
            decoder: PcmDecoder::new(transform_size),
            ring_buffer: RingBuffer::new(config.ring_capacity()),
            transform: SpectrumTransform::new(transform_size, config.window),
            analysis_block: vec![0.0; transform_size],
            frame_pool: FramePool::new(config.frame_pool_size, config.bins()),
            waveform: None,
            loudness: Arc::new(AtomicF32::new(0.0)),
            stats: Arc::new(ProcessorStats::default()),
            transform_size,
            hop_size: config.hop_size,
            active: false,
            failure_log_counter: 0,
            rejected_log_counter: 0,
        })
    }

    /// Start publishing raw mono blocks; call before audio starts
    pub fn attach_waveform_tap(&mut self) -> WaveformOutput {
        let (tap, output) = WaveformTap::new();
        self.waveform = Some(tap);
        output
    }

    /// Stream (re)configuration. Returns whether analysis is active
    ///
    /// Unsupported encodings or channel layouts disable processing until a
    /// supported format is configured.
    pub fn configure(&mut self, format: AudioFormat) -> bool {
        log::info!("Audio format: {format}");

        if self.decoder.format() != Some(format) {
            // Never mix samples from different stream layouts in one window
            self.clear_buffers();
        }

        match self.decoder.set_format(format) {
            Ok(()) => self.active = true,
            Err(err) => {
                log::warn!("{err}, spectrum analysis disabled");
                self.decoder.clear_format();
                self.active = false;
            }
        }
        self.active
    }

    /// One render callback worth of encoded audio
    pub fn ingest(&mut self, buffer: &[u8]) {
        self.ingest_with_len(buffer, buffer.len());
    }

    /// Like [`Self::ingest`] but only the first `byte_length` bytes are valid
    ///
    /// Never fails: errors are logged and the callback returns, so a single
    /// bad buffer cannot stall playback.
    pub fn ingest_with_len(&mut self, buffer: &[u8], byte_length: usize) {
        if !self.active {
            return;
        }
        if let Err(err) = self.try_ingest(buffer, byte_length) {
            self.record_failure(&err);
        }
    }

    /// Already-decoded interleaved float samples in the configured layout
    pub fn ingest_samples(&mut self, interleaved: &[f32]) {
        if !self.active {
            return;
        }
        let Some(format) = self.decoder.format() else {
            return;
        };

        let chunk = self.transform_size * format.channel_count as usize;
        for block in interleaved.chunks(chunk) {
            let mono = self.decoder.downmix_samples(block);
            self.ring_buffer.write(mono);
            if let Some(tap) = self.waveform.as_mut() {
                tap.write_samples(mono);
            }
            if let Err(err) = self.drain_hops() {
                self.record_failure(&err);
                return;
            }
        }
    }

    fn try_ingest(&mut self, buffer: &[u8], byte_length: usize) -> Result<(), IngestError> {
        if byte_length > buffer.len() {
            return Err(IngestError::Malformed {
                declared: byte_length,
                actual: buffer.len(),
            });
        }

        let chunk_bytes = self.decoder.chunk_bytes();
        if chunk_bytes == 0 {
            return Err(IngestError::UnsupportedFormat("no format configured".into()));
        }

        // Chunks of at most one transform of mono samples keep the ring from
        // overrunning inside a single oversized callback
        for block in buffer[..byte_length].chunks(chunk_bytes) {
            let mono = self.decoder.decode(block);
            self.ring_buffer.write(mono);
            if let Some(tap) = self.waveform.as_mut() {
                tap.write_samples(mono);
            }
            self.drain_hops()?;
        }
        Ok(())
    }

    /// Analyse every complete window, stepping by hop size for overlap
    fn drain_hops(&mut self) -> Result<(), IngestError> {
        while self.ring_buffer.has_available(self.transform_size) {
            self.ring_buffer.read_into(&mut self.analysis_block);

            match self.transform.process(&self.analysis_block) {
                Ok(Some(analysis)) => {
                    let frame = self
                        .frame_pool
                        .checkout(analysis.magnitudes, analysis.rms, now_ms());
                    self.loudness.store(analysis.rms, Ordering::Relaxed);
                    // NEVER block here - would stall the audio thread
                    self.sink.try_publish(frame);

                    self.stats.frames_published.fetch_add(1, Ordering::Relaxed);
                    self.stats
                        .pool_fallbacks
                        .store(self.frame_pool.fallback_allocations(), Ordering::Relaxed);
                }
                Ok(None) => {
                    self.stats.frames_rejected.fetch_add(1, Ordering::Relaxed);
                    if should_log(&mut self.rejected_log_counter) {
                        log::debug!("Non-finite spectrum values, skipping frame");
                    }
                }
                Err(err) => {
                    self.ring_buffer.advance(self.hop_size);
                    return Err(err);
                }
            }

            self.ring_buffer.advance(self.hop_size);
        }
        Ok(())
    }

    fn record_failure(&mut self, err: &IngestError) {
        self.stats.callbacks_failed.fetch_add(1, Ordering::Relaxed);
        if should_log(&mut self.failure_log_counter) {
            log::error!("Error processing audio input: {err}");
        }
    }

    fn clear_buffers(&mut self) {
        self.ring_buffer.clear();
        if let Some(tap) = self.waveform.as_mut() {
            tap.clear();
        }
    }

    /// Seek or discontinuity: drop buffered samples, stay active
    pub fn flush(&mut self) {
        self.clear_buffers();
    }

    /// Stream teardown: drop buffered samples and deactivate until reconfigured
    pub fn reset(&mut self) {
        self.clear_buffers();
        self.decoder.clear_format();
        self.active = false;
        self.loudness.store(0.0, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn format(&self) -> Option<AudioFormat> {
        self.decoder.format()
    }

    /// Samples waiting for the next window
    pub fn buffered_samples(&self) -> usize {
        self.ring_buffer.available()
    }

    pub fn transform_size(&self) -> usize {
        self.transform_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn loudness(&self) -> Arc<AtomicF32> {
        Arc::clone(&self.loudness)
    }

    pub fn stats(&self) -> Arc<ProcessorStats> {
        Arc::clone(&self.stats)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

/// True for the first failure and then once every `LOG_EVERY_N_FAILURES`
fn should_log(counter: &mut u32) -> bool {
    let previous = *counter;
    *counter = counter.wrapping_add(1);
    previous % LOG_EVERY_N_FAILURES == 0
}
