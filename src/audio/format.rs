use crate::audio::constants::{PCM16_BYTES, PCM_FLOAT_BYTES};
use crate::error::IngestError;
use dasp::Sample;
use std::fmt;

/// Sample encoding reported by the playback engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Pcm8,
    Pcm16,
    Pcm24,
    Pcm32,
    PcmFloat,
    /// Compressed passthrough (AC-3, DTS, ...) or anything else not decodable here
    Encoded,
}

impl Encoding {
    /// Bytes per sample for the encodings we can analyse
    pub fn bytes_per_sample(self) -> Option<usize> {
        match self {
            Self::Pcm16 => Some(PCM16_BYTES),
            Self::PcmFloat => Some(PCM_FLOAT_BYTES),
            _ => None,
        }
    }

    pub fn is_supported(self) -> bool {
        self.bytes_per_sample().is_some()
    }
}

/// Stream format supplied once per (re)configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub encoding: Encoding,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channel_count: u16, encoding: Encoding) -> Self {
        Self {
            sample_rate,
            channel_count,
            encoding,
        }
    }

    /// Only 16-bit and float PCM in mono or stereo can be analysed
    pub fn validate(&self) -> Result<(), IngestError> {
        if !self.encoding.is_supported() {
            return Err(IngestError::UnsupportedFormat(format!(
                "encoding {:?}",
                self.encoding
            )));
        }
        if !matches!(self.channel_count, 1 | 2) {
            return Err(IngestError::UnsupportedFormat(format!(
                "{} channels",
                self.channel_count
            )));
        }
        Ok(())
    }

    /// Bytes in one interleaved frame (all channels), if the format is supported
    pub fn frame_bytes(&self) -> Option<usize> {
        self.encoding
            .bytes_per_sample()
            .map(|bytes| bytes * self.channel_count as usize)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Hz, {}ch, encoding={:?}",
            self.sample_rate, self.channel_count, self.encoding
        )
    }
}

/// Decodes little-endian PCM bytes into normalised mono samples
///
/// The output buffer is sized once for `max_frames`; callers feed at most
/// [`PcmDecoder::chunk_bytes`] bytes per call so decoding never allocates.
pub struct PcmDecoder {
    format: Option<AudioFormat>,
    mono: Vec<f32>,
    max_frames: usize,
}

impl PcmDecoder {
    pub fn new(max_frames: usize) -> Self {
        Self {
            format: None,
            mono: Vec::with_capacity(max_frames),
            max_frames,
        }
    }

    /// Accepts only formats that pass [`AudioFormat::validate`]
    pub fn set_format(&mut self, format: AudioFormat) -> Result<(), IngestError> {
        format.validate()?;
        self.format = Some(format);
        Ok(())
    }

    pub fn clear_format(&mut self) {
        self.format = None;
    }

    pub fn format(&self) -> Option<AudioFormat> {
        self.format
    }

    /// Largest byte slice one [`PcmDecoder::decode`] call accepts
    pub fn chunk_bytes(&self) -> usize {
        self.format
            .and_then(|format| format.frame_bytes())
            .map_or(0, |frame_bytes| frame_bytes * self.max_frames)
    }

    /// Decode whole frames from `bytes`, downmixing stereo to mono
    ///
    /// A trailing partial frame is ignored. Returns an empty slice when no
    /// format is configured.
    pub fn decode(&mut self, bytes: &[u8]) -> &[f32] {
        self.mono.clear();
        let Some(format) = self.format else {
            return &self.mono;
        };
        let Some(frame_bytes) = format.frame_bytes() else {
            return &self.mono;
        };

        let channels = format.channel_count as usize;
        let sample_bytes = frame_bytes / channels;

        for frame in bytes.chunks_exact(frame_bytes).take(self.max_frames) {
            let mut sum = 0.0f32;
            for sample in frame.chunks_exact(sample_bytes) {
                sum += decode_sample(format.encoding, sample);
            }
            self.mono.push(downmix(sum, channels));
        }
        &self.mono
    }

    /// Downmix already-decoded interleaved float samples
    pub fn downmix_samples(&mut self, interleaved: &[f32]) -> &[f32] {
        self.mono.clear();
        let Some(format) = self.format else {
            return &self.mono;
        };

        let channels = format.channel_count as usize;
        for frame in interleaved.chunks_exact(channels).take(self.max_frames) {
            let sum: f32 = frame.iter().sum();
            self.mono.push(downmix(sum, channels));
        }
        &self.mono
    }
}

#[inline]
fn downmix(sum: f32, channels: usize) -> f32 {
    if channels == 2 {
        sum / 2.0
    } else {
        sum
    }
}

#[inline]
fn decode_sample(encoding: Encoding, bytes: &[u8]) -> f32 {
    match encoding {
        // i16 -> f32 divides by 32768
        Encoding::Pcm16 => i16::from_le_bytes([bytes[0], bytes[1]]).to_sample::<f32>(),
        Encoding::PcmFloat => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        _ => 0.0,
    }
}
