use crate::audio::constants::WAVEFORM_SIZE;
use triple_buffer::TripleBuffer;

/// One block of mono time-domain samples for oscilloscope-style display
pub type WaveformData = [f32; WAVEFORM_SIZE];

/// Collects mono samples on the audio thread and publishes full blocks
pub struct WaveformTap {
    // Triple buffer for the lock-free communication
    producer: triple_buffer::Input<WaveformData>,

    // Block being filled (audio thread only)
    temp_buffer: WaveformData,

    // Position in temp_buffer
    write_position: usize,
}

/// UI-side reader of the latest complete waveform block
pub struct WaveformOutput {
    consumer: triple_buffer::Output<WaveformData>,
}

impl WaveformTap {
    /// Returns (tap for audio thread, output for UI thread)
    pub fn new() -> (Self, WaveformOutput) {
        let (producer, consumer) = TripleBuffer::new(&[0.0; WAVEFORM_SIZE]).split();

        (
            Self {
                producer,
                temp_buffer: [0.0; WAVEFORM_SIZE],
                write_position: 0,
            },
            WaveformOutput { consumer },
        )
    }

    // Called from audio thread - NO ALLOCATIONS!
    pub fn write_samples(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.temp_buffer[self.write_position] = sample;
            self.write_position += 1;
            if self.write_position >= WAVEFORM_SIZE {
                // Block is full, hand it to the consumer
                self.producer.write(self.temp_buffer);
                self.write_position = 0;
            }
        }
    }

    /// Discard the partially filled block (stream flush)
    pub fn clear(&mut self) {
        self.write_position = 0;
    }
}

impl WaveformOutput {
    // Called from UI thread - can allocate
    pub fn read(&mut self) -> Vec<f32> {
        self.consumer.read().to_vec()
    }

    /// Whether a new block arrived since the last read
    pub fn updated(&mut self) -> bool {
        self.consumer.updated()
    }
}
