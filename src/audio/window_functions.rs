/// Window functions for FFT spectral analysis
///
/// This module provides the window tables applied to each analysis block
/// before the forward FFT.
use apodize::blackman_iter;
use core::f64::consts::PI;
use libm::cos;

/// Window function types for FFT analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowType {
    /// Rectangular: No windowing, maximum frequency resolution
    Rectangular,
    /// Hann: Good general-purpose balance
    Hann,
    /// Blackman-Harris (4-term, via apodize): excellent sidelobe
    /// suppression, wider main lobe
    Blackman,
}

impl WindowType {
    /// Generate window coefficients for this window type
    pub fn generate(self, window_size: usize) -> Vec<f32> {
        match self {
            Self::Rectangular => vec![1.0; window_size],
            Self::Hann => generate_hann_window(window_size),
            Self::Blackman => blackman_iter(window_size).map(|w| w as f32).collect(),
        }
    }
}

/// Pre-computed window data for efficient FFT processing
///
/// Computing window functions involves trig operations. By pre-computing once
/// at configuration time, we avoid these calculations in the real-time audio
/// thread. Immutable after construction.
#[derive(Debug, Clone)]
pub struct WindowTable {
    window_type: WindowType,
    coefficients: Vec<f32>,
    /// Average window value (Hann ~0.5, Blackman-Harris ~0.36, Rectangular 1.0)
    coherent_gain: f32,
}

impl WindowTable {
    pub fn new(window_type: WindowType, window_size: usize) -> Self {
        let coefficients = window_type.generate(window_size);
        let coherent_gain = if coefficients.is_empty() {
            0.0
        } else {
            coefficients.iter().sum::<f32>() / coefficients.len() as f32
        };

        Self {
            window_type,
            coefficients,
            coherent_gain,
        }
    }

    pub fn hann(window_size: usize) -> Self {
        Self::new(WindowType::Hann, window_size)
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }

    pub fn coherent_gain(&self) -> f32 {
        self.coherent_gain
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Multiply `samples` by the window into `out` (element-wise, no allocation)
    pub fn apply_into(&self, samples: &[f32], out: &mut [f32]) {
        for ((dst, &sample), &coeff) in out
            .iter_mut()
            .zip(samples.iter())
            .zip(self.coefficients.iter())
        {
            *dst = sample * coeff;
        }
    }
}

/// Generates symmetric Hann window coefficients
///
/// Hann formula: w[n] = 0.5 * (1 - cos(2πn/(N-1))) where n=[0..N-1]
/// - Both end points are exactly zero
/// - Main lobe width: 4 bins
/// - Sidelobe suppression: -31.5 dB
///
/// Only the first half is evaluated; the second half is mirrored so
/// `w[i] == w[N-1-i]` holds bit-for-bit.
pub fn generate_hann_window(window_size: usize) -> Vec<f32> {
    let mut window = vec![0.0f32; window_size];
    if window_size < 2 {
        window.fill(1.0);
        return window;
    }

    let denominator = (window_size - 1) as f64;
    for i in 0..window_size.div_ceil(2) {
        let coeff = (0.5 * (1.0 - cos(2.0 * PI * i as f64 / denominator))) as f32;
        window[i] = coeff;
        window[window_size - 1 - i] = coeff;
    }
    window[0] = 0.0;
    window[window_size - 1] = 0.0;
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_is_symmetric_with_zero_edges() {
        for &n in &[4usize, 5, 64, 2048] {
            let w = WindowTable::hann(n);
            let c = w.coefficients();
            assert_eq!(c.len(), n);
            assert_eq!(c[0], 0.0);
            assert_eq!(c[n - 1], 0.0);
            for i in 0..n {
                assert_eq!(c[i], c[n - 1 - i], "asymmetric at {i} for n={n}");
            }
        }
    }

    #[test]
    fn hann_peaks_near_center() {
        let w = WindowTable::hann(2049);
        assert!((w.coefficients()[1024] - 1.0).abs() < 1e-6);
        assert!((w.coherent_gain() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn blackman_and_rectangular_tables() {
        let b = WindowTable::new(WindowType::Blackman, 512);
        assert_eq!(b.len(), 512);
        // 4-term Blackman-Harris: a0 = 0.35875, endpoints near zero
        assert!((b.coherent_gain() - 0.3588).abs() < 2e-3);
        assert!(b.coefficients()[0] < 1e-3);
        assert!(b.coefficients().iter().copied().fold(0.0f32, f32::max) > 0.99);

        let r = WindowTable::new(WindowType::Rectangular, 16);
        assert!(r.coefficients().iter().all(|&c| c == 1.0));
        assert_eq!(r.coherent_gain(), 1.0);
    }

    #[test]
    fn apply_into_multiplies_element_wise() {
        let w = WindowTable::hann(5);
        let mut out = [9.0f32; 5];
        w.apply_into(&[2.0; 5], &mut out);
        assert_eq!(out[0], 0.0);
        assert!((out[2] - 2.0).abs() < 1e-6);
        assert_eq!(out[4], 0.0);
    }
}
