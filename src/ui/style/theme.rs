/// Linear RGBA colour, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise interpolation, `fraction` 0 gives `self`
    pub fn lerp(self, end: Color, fraction: f32) -> Self {
        Self {
            r: self.r + (end.r - self.r) * fraction,
            g: self.g + (end.g - self.g) * fraction,
            b: self.b + (end.b - self.b) * fraction,
            a: self.a + (end.a - self.a) * fraction,
        }
    }
}

/// colors and renderer dimensions only
/// Audio-related constants are in audio::constants
pub struct UITheme;

impl UITheme {
    // === COLORS ===

    pub const PRIMARY: Color = Color::from_rgb(0.0, 0.831, 1.0); // Cyan
    pub const SECONDARY: Color = Color::from_rgb(1.0, 0.0, 1.0); // Magenta

    /// Low to high frequency bar gradient
    pub const SPECTRUM_GRADIENT: [Color; 5] = [
        Color::from_rgb(0.0, 0.831, 1.0), // Cyan
        Color::from_rgb(0.0, 1.0, 0.533), // Green
        Color::from_rgb(1.0, 1.0, 0.0),   // Yellow
        Color::from_rgb(1.0, 0.533, 0.0), // Orange
        Color::from_rgb(1.0, 0.0, 0.533), // Pink
    ];

    /// Primary -> secondary -> primary sweep along the waveform
    pub const WAVEFORM_GRADIENT: [Color; 3] = [Self::PRIMARY, Self::SECONDARY, Self::PRIMARY];

    /// Opacity at the foot of a bar's vertical gradient
    pub const BAR_FADE_ALPHA: f32 = 0.3;
    pub const MIRROR_ALPHA: f32 = 0.5;

    // === DIMENSIONS ===

    /// Gap between bars as a fraction of the bar slot
    pub const BAR_SPACING: f32 = 0.15;
    pub const BAR_CORNER_RADIUS: f32 = 4.0;
    pub const MIN_BAR_HEIGHT: f32 = 2.0;
    /// Tallest bar relative to the canvas height
    pub const BAR_MAX_HEIGHT_RATIO: f32 = 0.95;

    pub const WAVE_LINE_WIDTH: f32 = 3.0;
    pub const WAVE_AMPLITUDE_RATIO: f32 = 0.4;
    pub const WAVE_MAX_POINTS: usize = 256;
    /// Mirrored strokes are thinner than the main one
    pub const MIRROR_WIDTH_RATIO: f32 = 0.7;

    pub const CIRCLE_INNER_RADIUS_RATIO: f32 = 0.3;
    pub const CIRCLE_MAX_BAR_RATIO: f32 = 0.35;
    pub const CIRCLE_LINE_WIDTH: f32 = 3.0;
    pub const CIRCLE_OUTLINE_WIDTH: f32 = 2.0;

    // === VISUAL HELPER FUNCTIONS ===

    /// Colour at `progress` in [0, 1] along [`UITheme::SPECTRUM_GRADIENT`]
    pub fn gradient_color(progress: f32) -> Color {
        let colors = &Self::SPECTRUM_GRADIENT;
        let scaled = progress.clamp(0.0, 1.0) * (colors.len() - 1) as f32;
        let lower = (scaled as usize).min(colors.len() - 2);
        colors[lower].lerp(colors[lower + 1], scaled - lower as f32)
    }
}
