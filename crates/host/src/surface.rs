#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Displayed size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

/// Two-stop horizontal gradient from `x0` to `x1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient<'a> {
    pub x0: f64,
    pub x1: f64,
    pub start: &'a str,
    pub end: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle<'a> {
    pub gradient: LinearGradient<'a>,
    pub line_width: f64,
    pub cap: LineCap,
}

/// A 2D drawing surface with a backing store that may differ from its
/// displayed size.
pub trait DrawSurface {
    fn client_size(&self) -> Size;

    /// Backing store resolution in device pixels.
    fn backing_size(&self) -> (u32, u32);

    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Reset the drawing transform to identity, then scale uniformly.
    fn reset_transform_and_scale(&mut self, scale: f64);

    fn clear(&mut self, width: f64, height: f64);

    /// Stroke a single open path through `points`.
    fn stroke(&mut self, points: &[Point], style: &StrokeStyle<'_>);
}
