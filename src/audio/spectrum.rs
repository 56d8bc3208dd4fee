use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// One analysed hop of audio, the unit published to consumers.
///
/// `magnitudes` holds `transform_size / 2` values, each normalised to the
/// frame's own peak. Per-frame normalisation keeps bar heights stable between
/// quiet and loud passages, but it also means magnitudes are not comparable
/// across frames: use `rms` for absolute level.
///
/// Never contains NaN or infinite values; frames that would are discarded
/// before publishing.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumFrame {
    pub magnitudes: Vec<f32>,
    /// Root-mean-square of the unwindowed block, clamped to [0, 1]
    pub rms: f32,
    /// Wall-clock capture time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl SpectrumFrame {
    pub fn new(magnitudes: Vec<f32>, rms: f32, timestamp_ms: u64) -> Self {
        Self {
            magnitudes,
            rms,
            timestamp_ms,
        }
    }

    /// Sentinel exposed before any audio has been analysed
    pub fn empty() -> Self {
        Self {
            magnitudes: Vec::new(),
            rms: 0.0,
            timestamp_ms: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.rms.is_finite() && self.magnitudes.iter().all(|m| m.is_finite())
    }
}

impl Default for SpectrumFrame {
    fn default() -> Self {
        Self::empty()
    }
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Recycles published frames so the audio thread does not allocate per hop
///
/// A slot is reused only once every downstream holder has dropped its
/// `Arc`. When all slots are still in flight a fresh frame is allocated and
/// replaces the oldest slot; [`FramePool::fallback_allocations`] counts these.
pub struct FramePool {
    slots: Vec<Arc<SpectrumFrame>>,
    next: usize,
    bins: usize,
    fallback_allocations: u64,
}

impl FramePool {
    pub fn new(size: usize, bins: usize) -> Self {
        let slots = (0..size.max(1))
            .map(|_| Arc::new(SpectrumFrame::new(Vec::with_capacity(bins), 0.0, 0)))
            .collect();

        Self {
            slots,
            next: 0,
            bins,
            fallback_allocations: 0,
        }
    }

    /// Fill a free frame in place and hand out a shared reference to it
    pub fn checkout(
        &mut self,
        magnitudes: &[f32],
        rms: f32,
        timestamp_ms: u64,
    ) -> Arc<SpectrumFrame> {
        let len = self.slots.len();
        for _ in 0..len {
            let idx = self.next;
            self.next = (self.next + 1) % len;

            if let Some(frame) = Arc::get_mut(&mut self.slots[idx]) {
                frame.magnitudes.clear();
                frame.magnitudes.extend_from_slice(magnitudes);
                frame.rms = rms;
                frame.timestamp_ms = timestamp_ms;
                return Arc::clone(&self.slots[idx]);
            }
        }

        // Every slot is still held downstream
        self.fallback_allocations += 1;
        let mut storage = Vec::with_capacity(self.bins.max(magnitudes.len()));
        storage.extend_from_slice(magnitudes);
        let frame = Arc::new(SpectrumFrame::new(storage, rms, timestamp_ms));

        let idx = self.next;
        self.next = (self.next + 1) % len;
        self.slots[idx] = Arc::clone(&frame);
        frame
    }

    pub fn fallback_allocations(&self) -> u64 {
        self.fallback_allocations
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
