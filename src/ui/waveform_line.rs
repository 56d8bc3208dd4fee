use crate::audio::spectrum::SpectrumFrame;
use crate::ui::draw::{DrawCommand, DrawList, Paint, Point, Size};
use crate::ui::renderer::VisualizerRenderer;
use crate::ui::style::UITheme;

/// Oscilloscope-style line traced over the magnitude array
///
/// Draws at most `WAVE_MAX_POINTS` points displaced upwards from the centre
/// line, an optional fainter mirror below it, and a centre line whose
/// brightness follows the frame RMS.
pub struct WaveformLine {
    line_width: f32,
    use_gradient: bool,
    mirror: bool,
    size: Size,
}

impl Default for WaveformLine {
    fn default() -> Self {
        Self {
            line_width: UITheme::WAVE_LINE_WIDTH,
            use_gradient: true,
            mirror: true,
            size: Size::ZERO,
        }
    }
}

impl WaveformLine {
    pub fn with_mirror(mut self, enabled: bool) -> Self {
        self.mirror = enabled;
        self
    }

    pub fn with_gradient(mut self, enabled: bool) -> Self {
        self.use_gradient = enabled;
        self
    }

    fn trace(&self, magnitudes: &[f32], direction: f32) -> Vec<Point> {
        let point_count = magnitudes.len().min(UITheme::WAVE_MAX_POINTS);
        let step_x = if point_count > 1 {
            self.size.width / (point_count - 1) as f32
        } else {
            0.0
        };
        let center_y = self.size.height / 2.0;
        let amplitude = self.size.height * UITheme::WAVE_AMPLITUDE_RATIO;

        magnitudes[..point_count]
            .iter()
            .enumerate()
            .map(|(i, &magnitude)| {
                Point::new(i as f32 * step_x, center_y + direction * magnitude * amplitude)
            })
            .collect()
    }
}

impl VisualizerRenderer for WaveformLine {
    fn id(&self) -> &'static str {
        "waveform"
    }

    fn display_name(&self) -> &'static str {
        "Waveform"
    }

    fn on_resize(&mut self, size: Size) {
        self.size = size;
    }

    fn render(&self, frame: &SpectrumFrame, out: &mut DrawList) {
        if frame.is_empty() || self.size.is_empty() {
            return;
        }

        let paint = if self.use_gradient {
            Paint::HorizontalGradient(&UITheme::WAVEFORM_GRADIENT)
        } else {
            Paint::Solid(UITheme::PRIMARY)
        };

        // Up is negative y
        out.push(DrawCommand::Polyline {
            points: self.trace(&frame.magnitudes, -1.0),
            width: self.line_width,
            paint,
            alpha: 1.0,
            smooth: true,
        });

        if self.mirror {
            out.push(DrawCommand::Polyline {
                points: self.trace(&frame.magnitudes, 1.0),
                width: self.line_width * UITheme::MIRROR_WIDTH_RATIO,
                paint,
                alpha: UITheme::MIRROR_ALPHA,
                smooth: true,
            });
        }

        let center_y = self.size.height / 2.0;
        let glow_alpha = (frame.rms * 0.5).clamp(0.1, 0.3);
        out.push(DrawCommand::Line {
            start: Point::new(0.0, center_y),
            end: Point::new(self.size.width, center_y),
            width: 1.0,
            paint: Paint::Solid(UITheme::PRIMARY.with_alpha(glow_alpha)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(renderer: WaveformLine) -> WaveformLine {
        let mut renderer = renderer;
        renderer.on_attach(Size::new(300.0, 100.0));
        renderer
    }

    #[test]
    fn traces_primary_mirror_and_centre_line() {
        let renderer = attached(WaveformLine::default());
        let frame = SpectrumFrame::new(vec![0.0, 1.0, 0.5, 0.0], 0.2, 0);
        let mut out = DrawList::new();
        renderer.render(&frame, &mut out);
        assert_eq!(out.len(), 3);

        let DrawCommand::Polyline { points, .. } = &out.commands()[0] else {
            panic!("expected polyline");
        };
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], Point::new(0.0, 50.0));
        // 1.0 * 100 * 0.4 above centre
        assert!((points[1].y - 10.0).abs() < 1e-4);
        assert!((points[3].x - 300.0).abs() < 1e-4);

        let DrawCommand::Polyline { points, alpha, .. } = &out.commands()[1] else {
            panic!("expected mirrored polyline");
        };
        assert!((points[1].y - 90.0).abs() < 1e-4);
        assert_eq!(*alpha, UITheme::MIRROR_ALPHA);
    }

    #[test]
    fn point_count_is_capped() {
        let renderer = attached(WaveformLine::default().with_mirror(false));
        let frame = SpectrumFrame::new(vec![0.3; 1024], 0.5, 0);
        let mut out = DrawList::new();
        renderer.render(&frame, &mut out);
        assert_eq!(out.len(), 2);

        let DrawCommand::Polyline { points, .. } = &out.commands()[0] else {
            panic!("expected polyline");
        };
        assert_eq!(points.len(), UITheme::WAVE_MAX_POINTS);
    }

    #[test]
    fn centre_glow_follows_rms_within_bounds() {
        let renderer = attached(WaveformLine::default().with_mirror(false));
        for (rms, expected) in [(0.0, 0.1), (0.4, 0.2), (1.0, 0.3)] {
            let mut out = DrawList::new();
            renderer.render(&SpectrumFrame::new(vec![0.5; 8], rms, 0), &mut out);
            let Some(DrawCommand::Line { paint: Paint::Solid(color), .. }) = out.commands().last()
            else {
                panic!("expected centre line");
            };
            assert!((color.a - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn single_point_does_not_divide_by_zero() {
        let renderer = attached(WaveformLine::default());
        let mut out = DrawList::new();
        renderer.render(&SpectrumFrame::new(vec![0.7], 0.1, 0), &mut out);
        let DrawCommand::Polyline { points, .. } = &out.commands()[0] else {
            panic!("expected polyline");
        };
        assert!(points[0].x.is_finite());
    }
}
