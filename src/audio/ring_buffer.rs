/// Fixed-capacity circular sample store used to accumulate audio between FFT hops
///
/// Sized once at construction and never reallocated, so it is safe to use
/// from the audio thread. When full, writes evict the oldest unread sample:
/// losing stale data is preferable to blocking or growing memory.
pub struct RingBuffer {
    data: Vec<f32>,
    write_pos: usize,
    read_pos: usize,
    count: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be non-zero");
        Self {
            data: vec![0.0; capacity],
            write_pos: 0,
            read_pos: 0,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Append samples, overwriting the oldest unread ones once full
    pub fn write(&mut self, samples: &[f32]) {
        let capacity = self.data.len();
        for &sample in samples {
            self.data[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % capacity;
            if self.count < capacity {
                self.count += 1;
            } else {
                // Full: the slot we just wrote was the oldest unread sample
                self.read_pos = (self.read_pos + 1) % capacity;
            }
        }
    }

    /// Copy the next `out.len()` unread samples into `out` without consuming them
    ///
    /// # Panics
    /// If `out.len()` exceeds [`Self::available`].
    pub fn read_into(&self, out: &mut [f32]) {
        let n = out.len();
        assert!(
            n <= self.count,
            "not enough samples: requested {n}, available {}",
            self.count
        );

        let capacity = self.data.len();
        let first = n.min(capacity - self.read_pos);
        out[..first].copy_from_slice(&self.data[self.read_pos..self.read_pos + first]);
        out[first..].copy_from_slice(&self.data[..n - first]);
    }

    /// Allocating variant of [`Self::read_into`] for non-real-time callers
    pub fn read(&self, n: usize) -> Vec<f32> {
        let mut out = vec![0.0; n];
        self.read_into(&mut out);
        out
    }

    /// Consume `n` samples
    ///
    /// # Panics
    /// If `n` exceeds [`Self::available`].
    pub fn advance(&mut self, n: usize) {
        assert!(
            n <= self.count,
            "cannot advance by {n}, only {} samples available",
            self.count
        );
        self.read_pos = (self.read_pos + n) % self.data.len();
        self.count -= n;
    }

    pub fn available(&self) -> usize {
        self.count
    }

    pub fn has_available(&self, n: usize) -> bool {
        self.count >= n
    }

    /// Drop all buffered samples (stream flush / reset)
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.read_pos = 0;
        self.count = 0;
    }
}
