use crate::audio::constants::DEFAULT_BAR_COUNT;
use crate::audio::display_utils::downsample_magnitudes;
use crate::audio::spectrum::SpectrumFrame;
use crate::ui::draw::{DrawCommand, DrawList, Paint, Point, Size};
use crate::ui::renderer::VisualizerRenderer;
use crate::ui::style::{Color, UITheme};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Radial bars around a ring, starting at 12 o'clock and running clockwise
pub struct CircularBars {
    bar_count: usize,
    use_gradient: bool,
    mirror_bars: bool,

    // Layout, recomputed on attach/resize
    center: Point,
    base_radius: f32,
    max_bar_length: f32,
    angles: Vec<f32>,
}

impl Default for CircularBars {
    fn default() -> Self {
        Self::new(DEFAULT_BAR_COUNT)
    }
}

impl CircularBars {
    pub fn new(bar_count: usize) -> Self {
        Self {
            bar_count: bar_count.max(1),
            use_gradient: true,
            mirror_bars: true,
            center: Point::default(),
            base_radius: 0.0,
            max_bar_length: 0.0,
            angles: Vec::new(),
        }
    }

    pub fn with_mirror(mut self, enabled: bool) -> Self {
        self.mirror_bars = enabled;
        self
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    fn point_at(&self, angle: f32, radius: f32) -> Point {
        Point::new(
            self.center.x + angle.cos() * radius,
            self.center.y + angle.sin() * radius,
        )
    }
}

impl VisualizerRenderer for CircularBars {
    fn id(&self) -> &'static str {
        "circular"
    }

    fn display_name(&self) -> &'static str {
        "Circular"
    }

    fn on_resize(&mut self, size: Size) {
        self.center = Point::new(size.width / 2.0, size.height / 2.0);
        let min_dimension = size.min_dimension();
        self.base_radius = min_dimension * UITheme::CIRCLE_INNER_RADIUS_RATIO;
        self.max_bar_length = min_dimension * UITheme::CIRCLE_MAX_BAR_RATIO;

        let angle_step = TAU / self.bar_count as f32;
        self.angles = (0..self.bar_count)
            .map(|i| i as f32 * angle_step - FRAC_PI_2)
            .collect();
    }

    fn on_detach(&mut self) {
        self.angles = Vec::new();
    }

    fn render(&self, frame: &SpectrumFrame, out: &mut DrawList) {
        if frame.is_empty() || self.angles.is_empty() {
            return;
        }

        let magnitudes = downsample_magnitudes(&frame.magnitudes, self.bar_count);

        // Centre glow brightens with loudness
        let glow_radius = self.base_radius * 0.8;
        let glow_alpha = (frame.rms * 0.4).clamp(0.05, 0.3);
        out.push(DrawCommand::Circle {
            center: self.center,
            radius: glow_radius,
            paint: Paint::RadialGradient {
                center: UITheme::PRIMARY.with_alpha(glow_alpha),
                edge: Color::TRANSPARENT,
            },
            stroke_width: None,
        });

        for (index, (&magnitude, &angle)) in magnitudes.iter().zip(&self.angles).enumerate() {
            let bar_length = magnitude * self.max_bar_length;
            let color = if self.use_gradient {
                UITheme::gradient_color(index as f32 / self.bar_count as f32)
            } else {
                UITheme::PRIMARY
            };

            let start = self.point_at(angle, self.base_radius);
            out.push(DrawCommand::Line {
                start,
                end: self.point_at(angle, self.base_radius + bar_length),
                width: UITheme::CIRCLE_LINE_WIDTH,
                paint: Paint::Solid(color),
            });

            if self.mirror_bars {
                out.push(DrawCommand::Line {
                    start,
                    end: self.point_at(angle, self.base_radius - bar_length * 0.5),
                    width: UITheme::CIRCLE_LINE_WIDTH * UITheme::MIRROR_WIDTH_RATIO,
                    paint: Paint::Solid(color.with_alpha(UITheme::MIRROR_ALPHA)),
                });
            }
        }

        out.push(DrawCommand::Circle {
            center: self.center,
            radius: self.base_radius,
            paint: Paint::SweepGradient(&UITheme::SPECTRUM_GRADIENT),
            stroke_width: Some(UITheme::CIRCLE_OUTLINE_WIDTH),
        });
    }
}
