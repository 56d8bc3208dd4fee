use crate::audio::constants::DEFAULT_BAR_COUNT;
use crate::audio::display_utils::{downsample_magnitudes, log_scale};
use crate::audio::spectrum::SpectrumFrame;
use crate::ui::draw::{DrawCommand, DrawList, Paint, Point, Size};
use crate::ui::renderer::VisualizerRenderer;
use crate::ui::style::UITheme;

/// Vertical frequency bars, low frequencies on the left
pub struct SpectrumBars {
    bar_count: usize,
    bar_spacing: f32,
    corner_radius: f32,
    use_gradient: bool,
    size: Size,
}

impl Default for SpectrumBars {
    fn default() -> Self {
        Self::new(DEFAULT_BAR_COUNT)
    }
}

impl SpectrumBars {
    pub fn new(bar_count: usize) -> Self {
        Self {
            bar_count: bar_count.max(1),
            bar_spacing: UITheme::BAR_SPACING,
            corner_radius: UITheme::BAR_CORNER_RADIUS,
            use_gradient: true,
            size: Size::ZERO,
        }
    }

    pub fn with_gradient(mut self, enabled: bool) -> Self {
        self.use_gradient = enabled;
        self
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }
}

impl VisualizerRenderer for SpectrumBars {
    fn id(&self) -> &'static str {
        "spectrum"
    }

    fn display_name(&self) -> &'static str {
        "Spectrum"
    }

    fn on_resize(&mut self, size: Size) {
        self.size = size;
    }

    fn render(&self, frame: &SpectrumFrame, out: &mut DrawList) {
        if frame.is_empty() || self.size.is_empty() {
            return;
        }

        let magnitudes = downsample_magnitudes(&frame.magnitudes, self.bar_count);
        let bar_width = self.size.width / self.bar_count as f32;
        let bar_width_with_gap = bar_width * (1.0 - self.bar_spacing);
        let max_height = self.size.height * UITheme::BAR_MAX_HEIGHT_RATIO;

        for (index, &magnitude) in magnitudes.iter().enumerate() {
            let bar_height =
                (log_scale(magnitude) * max_height).max(UITheme::MIN_BAR_HEIGHT);
            let x = index as f32 * bar_width + (bar_width - bar_width_with_gap) / 2.0;
            let y = self.size.height - bar_height;

            let paint = if self.use_gradient {
                // Colour follows frequency position
                let color = UITheme::gradient_color(index as f32 / self.bar_count as f32);
                Paint::VerticalGradient {
                    top: color,
                    bottom: color.with_alpha(UITheme::BAR_FADE_ALPHA),
                }
            } else {
                Paint::Solid(UITheme::PRIMARY)
            };

            out.push(DrawCommand::Rect {
                top_left: Point::new(x, y),
                size: Size::new(bar_width_with_gap, bar_height),
                corner_radius: self.corner_radius,
                paint,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(size: Size) -> SpectrumBars {
        let mut renderer = SpectrumBars::new(4);
        renderer.on_attach(size);
        renderer
    }

    #[test]
    fn empty_frame_draws_nothing() {
        let mut out = DrawList::new();
        bars(Size::new(400.0, 200.0)).render(&SpectrumFrame::empty(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn one_rect_per_bar_sized_from_log_scale() {
        let renderer = bars(Size::new(400.0, 200.0));
        let frame = SpectrumFrame::new(vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0], 0.5, 1);
        let mut out = DrawList::new();
        renderer.render(&frame, &mut out);
        assert_eq!(out.len(), 4);

        let DrawCommand::Rect { top_left, size, .. } = &out.commands()[1] else {
            panic!("expected a rect");
        };
        // Full magnitude reaches 95% of the canvas
        assert!((size.height - 190.0).abs() < 1e-3);
        assert!((top_left.y - 10.0).abs() < 1e-3);
        // 15% gap, centred in the 100px slot
        assert!((size.width - 85.0).abs() < 1e-3);
        assert!((top_left.x - 107.5).abs() < 1e-3);

        // Silent bars keep a minimum height
        let DrawCommand::Rect { size, .. } = &out.commands()[0] else {
            panic!("expected a rect");
        };
        assert_eq!(size.height, UITheme::MIN_BAR_HEIGHT);
    }

    #[test]
    fn solid_paint_without_gradient() {
        let mut renderer = SpectrumBars::new(2).with_gradient(false);
        renderer.on_attach(Size::new(10.0, 10.0));
        let mut out = DrawList::new();
        renderer.render(&SpectrumFrame::new(vec![0.5, 0.5], 0.1, 0), &mut out);
        assert!(out
            .iter()
            .all(|cmd| matches!(cmd, DrawCommand::Rect { paint: Paint::Solid(_), .. })));
    }
}
