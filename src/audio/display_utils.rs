/// Reduce a magnitude array to `target_bars` values by max-pooling
///
/// Each output bar takes the loudest input bin in its equal-width range, so
/// narrow peaks stay visible. Empty input or zero bars yields an empty vector;
/// inputs already at or below the target are copied unchanged.
pub fn downsample_magnitudes(magnitudes: &[f32], target_bars: usize) -> Vec<f32> {
    if magnitudes.is_empty() || target_bars == 0 {
        return Vec::new();
    }
    if magnitudes.len() <= target_bars {
        return magnitudes.to_vec();
    }

    let bin_size = magnitudes.len() as f32 / target_bars as f32;
    (0..target_bars)
        .map(|bar| {
            let start = (bar as f32 * bin_size) as usize;
            let end = (((bar + 1) as f32 * bin_size) as usize).min(magnitudes.len());
            magnitudes[start..end]
                .iter()
                .copied()
                .fold(0.0f32, f32::max)
        })
        .collect()
}

/// Perceptual bar heights for a whole magnitude array, see [`log_scale`]
pub fn apply_log_scale(magnitudes: &[f32]) -> Vec<f32> {
    magnitudes.iter().map(|&m| log_scale(m)).collect()
}

/// Perceptual bar height: `log10(1 + 9x)` clamped to [0, 1]
#[inline]
pub fn log_scale(magnitude: f32) -> f32 {
    libm::log10f(1.0 + magnitude.max(0.0) * 9.0).clamp(0.0, 1.0)
}

/// Centre frequency in Hz of an FFT bin
#[inline]
pub fn bin_to_frequency(bin: usize, sample_rate: u32, transform_size: usize) -> f32 {
    if transform_size == 0 {
        return 0.0;
    }
    bin as f32 * sample_rate as f32 / transform_size as f32
}

/// Index of the loudest bin, first one wins on ties
pub fn peak_bin(magnitudes: &[f32]) -> Option<usize> {
    let mut peak: Option<(usize, f32)> = None;
    for (i, &magnitude) in magnitudes.iter().enumerate() {
        match peak {
            Some((_, best)) if magnitude <= best => {}
            _ => peak = Some((i, magnitude)),
        }
    }
    peak.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downsample_takes_max_of_each_range() {
        let magnitudes = [0.1, 0.9, 0.2, 0.3, 0.0, 0.5, 0.4, 0.4];
        assert_eq!(downsample_magnitudes(&magnitudes, 4), vec![0.9, 0.3, 0.5, 0.4]);
        assert_eq!(downsample_magnitudes(&magnitudes, 1), vec![0.9]);
    }

    #[test]
    fn downsample_uneven_ranges_cover_every_bin() {
        let mut magnitudes = vec![0.0; 10];
        magnitudes[9] = 1.0;
        let bars = downsample_magnitudes(&magnitudes, 3);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[2], 1.0);
    }

    #[test]
    fn downsample_edge_cases() {
        assert!(downsample_magnitudes(&[], 64).is_empty());
        assert!(downsample_magnitudes(&[0.5, 0.5], 0).is_empty());
        assert_eq!(downsample_magnitudes(&[0.2, 0.7], 64), vec![0.2, 0.7]);
    }

    #[test]
    fn log_scale_endpoints_and_clamp() {
        assert_eq!(log_scale(0.0), 0.0);
        assert!((log_scale(1.0) - 1.0).abs() < 1e-6);
        assert_eq!(log_scale(5.0), 1.0);
        assert_eq!(log_scale(-1.0), 0.0);
        // Boosts quiet values
        assert!(log_scale(0.1) > 0.1);
    }

    #[test]
    fn log_scale_maps_whole_array() {
        let scaled = apply_log_scale(&[0.0, 1.0, 0.1, 2.0]);
        assert_eq!(scaled.len(), 4);
        assert_eq!(scaled[0], 0.0);
        assert!((scaled[1] - 1.0).abs() < 1e-6);
        assert!((scaled[2] - libm::log10f(1.9)).abs() < 1e-6);
        assert_eq!(scaled[3], 1.0);
        assert!(apply_log_scale(&[]).is_empty());
    }

    #[test]
    fn bin_frequency_and_peak() {
        assert_eq!(bin_to_frequency(0, 44100, 2048), 0.0);
        assert!((bin_to_frequency(20, 44100, 2048) - 430.664).abs() < 0.01);
        assert_eq!(bin_to_frequency(3, 44100, 0), 0.0);

        assert_eq!(peak_bin(&[0.1, 0.8, 0.8, 0.2]), Some(1));
        assert_eq!(peak_bin(&[]), None);
    }
}
