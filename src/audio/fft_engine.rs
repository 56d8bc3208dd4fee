use crate::audio::spectrum::SpectrumFrame;
use crate::audio::window_functions::{WindowTable, WindowType};
use crate::error::IngestError;
use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Borrowed result of one transform, valid until the next call
#[derive(Debug, Clone, Copy)]
pub struct Analysis<'a> {
    /// `transform_size / 2` magnitudes normalised to the frame peak
    pub magnitudes: &'a [f32],
    /// RMS of the unwindowed block, clamped to [0, 1]
    pub rms: f32,
}

/// Windowed forward real FFT plus magnitude/loudness extraction
///
/// Everything is planned and allocated in [`SpectrumTransform::new`];
/// [`SpectrumTransform::process`] is allocation free and safe to call from
/// the audio thread.
pub struct SpectrumTransform {
    // FFT instance
    fft: Arc<dyn RealToComplex<f32>>,

    // Window function (precomputed for efficiency)
    window: WindowTable,

    //Buffers
    time_domain_buffer: Vec<f32>,            // Windowed samples (N)
    frequency_domain_buffer: Vec<Complex32>, // FFT output (N/2 + 1 bins)
    scratch: Vec<Complex32>,
    magnitudes: Vec<f32>, // Published bins (N/2)

    size: usize,
}

impl SpectrumTransform {
    pub fn new(size: usize, window_type: WindowType) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);

        let time_domain_buffer = fft.make_input_vec();
        let frequency_domain_buffer = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();

        Self {
            fft,
            window: WindowTable::new(window_type, size),
            time_domain_buffer,
            frequency_domain_buffer,
            scratch,
            magnitudes: vec![0.0; size / 2],
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bins(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn window(&self) -> &WindowTable {
        &self.window
    }

    /// Analyse exactly `size` samples
    ///
    /// Returns `Ok(None)` when the block would produce a NaN or infinite
    /// value; such frames are dropped, never published.
    pub fn process(&mut self, samples: &[f32]) -> Result<Option<Analysis<'_>>, IngestError> {
        if samples.len() != self.size {
            return Err(IngestError::BlockSize {
                expected: self.size,
                actual: samples.len(),
            });
        }

        // Step 1: Loudness over the raw (unwindowed) block
        let rms = compute_rms(samples);
        if !rms.is_finite() {
            return Ok(None);
        }

        // Step 2: Apply window function to input
        self.window.apply_into(samples, &mut self.time_domain_buffer);

        // Step 3: Run FFT (time domain -> frequency domain)
        self.fft.process_with_scratch(
            &mut self.time_domain_buffer,
            &mut self.frequency_domain_buffer,
            &mut self.scratch,
        )?;

        // Step 4: Bin magnitudes, then normalise to the frame peak
        compute_magnitudes(&self.frequency_domain_buffer, &mut self.magnitudes);
        if self.magnitudes.iter().any(|m| !m.is_finite()) {
            return Ok(None);
        }
        normalize_to_peak(&mut self.magnitudes);

        Ok(Some(Analysis {
            magnitudes: &self.magnitudes,
            rms: rms.clamp(0.0, 1.0),
        }))
    }

    /// Allocating convenience wrapper for non-real-time callers
    pub fn analyze(
        &mut self,
        samples: &[f32],
        timestamp_ms: u64,
    ) -> Result<Option<SpectrumFrame>, IngestError> {
        let frame = self.process(samples)?.map(|analysis| {
            SpectrumFrame::new(analysis.magnitudes.to_vec(), analysis.rms, timestamp_ms)
        });
        Ok(frame)
    }
}

/// Root-mean-square of a block: sqrt(mean(x²))
pub fn compute_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

/// Convert the N/2+1 complex bins into N/2 magnitudes
///
/// Bin 0 is |DC|, the last bin carries |Nyquist| and interior bins are
/// sqrt(re² + im²). DC and Nyquist are purely real for a real input.
pub fn compute_magnitudes(frequency_bins: &[Complex32], magnitudes: &mut [f32]) {
    let num_bins = magnitudes.len();
    if num_bins == 0 || frequency_bins.is_empty() {
        return;
    }

    magnitudes[0] = frequency_bins[0].re.abs();
    for i in 1..num_bins.saturating_sub(1) {
        magnitudes[i] = frequency_bins[i].norm();
    }
    if num_bins > 1 {
        if let Some(nyquist) = frequency_bins.last() {
            magnitudes[num_bins - 1] = nyquist.re.abs();
        }
    }
}

/// Divide by the frame maximum, clamping to [0, 1]
///
/// An all-zero (or otherwise non-positive) frame is left untouched.
pub fn normalize_to_peak(magnitudes: &mut [f32]) {
    let max_magnitude = magnitudes.iter().copied().fold(0.0f32, f32::max);
    if max_magnitude > 0.0 {
        for magnitude in magnitudes.iter_mut() {
            *magnitude = (*magnitude / max_magnitude).clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: f32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn sine_peak_lands_on_expected_bin() {
        let mut transform = SpectrumTransform::new(2048, WindowType::Hann);
        let samples = sine(440.0, 44100.0, 2048, 0.8);
        let analysis = transform.process(&samples).unwrap().unwrap();

        assert_eq!(analysis.magnitudes.len(), 1024);
        let (peak, _) = analysis
            .magnitudes
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
        // 440 * 2048 / 44100 ≈ 20.4
        assert!((19..=21).contains(&peak), "peak at bin {peak}");
    }

    #[test]
    fn normalised_peak_is_exactly_one() {
        let mut transform = SpectrumTransform::new(512, WindowType::Hann);
        let samples = sine(1000.0, 48000.0, 512, 0.3);
        let analysis = transform.process(&samples).unwrap().unwrap();
        let max = analysis.magnitudes.iter().copied().fold(0.0f32, f32::max);
        assert_eq!(max, 1.0);
        assert!(analysis.magnitudes.iter().all(|&m| (0.0..=1.0).contains(&m)));
    }

    #[test]
    fn silence_yields_all_zero_frame() {
        let mut transform = SpectrumTransform::new(256, WindowType::Hann);
        let analysis = transform.process(&[0.0; 256]).unwrap().unwrap();
        assert!(analysis.magnitudes.iter().all(|&m| m == 0.0));
        assert_eq!(analysis.rms, 0.0);
    }

    #[test]
    fn rms_uses_unwindowed_samples() {
        let mut transform = SpectrumTransform::new(64, WindowType::Hann);
        // Constant 0.5: windowing would shrink the energy, raw RMS must stay 0.5
        let analysis = transform.process(&[0.5; 64]).unwrap().unwrap();
        assert!((analysis.rms - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rms_is_clamped_to_unit_range() {
        let mut transform = SpectrumTransform::new(64, WindowType::Hann);
        let analysis = transform.process(&[3.0; 64]).unwrap().unwrap();
        assert_eq!(analysis.rms, 1.0);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut transform = SpectrumTransform::new(64, WindowType::Hann);
        let mut samples = vec![0.1; 64];
        samples[10] = f32::INFINITY;
        assert!(transform.process(&samples).unwrap().is_none());

        samples[10] = f32::NAN;
        assert!(transform.process(&samples).unwrap().is_none());
    }

    #[test]
    fn wrong_block_size_is_an_error() {
        let mut transform = SpectrumTransform::new(64, WindowType::Hann);
        assert!(matches!(
            transform.process(&[0.0; 32]),
            Err(IngestError::BlockSize { expected: 64, actual: 32 })
        ));
    }

    #[test]
    fn magnitude_layout_uses_dc_and_nyquist_real_parts() {
        let bins = [
            Complex32::new(-3.0, 0.0),
            Complex32::new(3.0, 4.0),
            Complex32::new(0.0, 1.0),
            Complex32::new(-2.0, 0.0),
        ];
        let mut magnitudes = [0.0f32; 3];
        compute_magnitudes(&bins, &mut magnitudes);
        assert_eq!(magnitudes, [3.0, 5.0, 2.0]);
    }

    #[test]
    fn analyze_builds_owned_frame() {
        let mut transform = SpectrumTransform::new(128, WindowType::Hann);
        let frame = transform
            .analyze(&sine(3000.0, 48000.0, 128, 0.5), 42)
            .unwrap()
            .unwrap();
        assert_eq!(frame.magnitudes.len(), 64);
        assert_eq!(frame.timestamp_ms, 42);
        assert!(frame.is_finite());
    }
}
