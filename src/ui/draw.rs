use crate::ui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// How a shape is filled or stroked
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Top edge to bottom edge of the shape
    VerticalGradient { top: Color, bottom: Color },
    /// Evenly spaced stops from left to right
    HorizontalGradient(&'static [Color]),
    /// Centre outwards
    RadialGradient { center: Color, edge: Color },
    /// Clockwise around the centre, starting at the top
    SweepGradient(&'static [Color]),
}

/// One backend-agnostic drawing primitive, in canvas pixels with y down
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        top_left: Point,
        size: Size,
        corner_radius: f32,
        paint: Paint,
    },
    Line {
        start: Point,
        end: Point,
        width: f32,
        paint: Paint,
    },
    /// Open path through `points`; `smooth` asks for quadratic curves
    /// through the segment midpoints instead of straight segments
    Polyline {
        points: Vec<Point>,
        width: f32,
        paint: Paint,
        alpha: f32,
        smooth: bool,
    },
    /// Filled when `stroke_width` is None
    Circle {
        center: Point,
        radius: f32,
        paint: Paint,
        stroke_width: Option<f32>,
    },
}

/// Commands produced for one rendered frame, in paint order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Keeps the allocation for the next frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }
}
