//! Pixel-space points and self-normalizing rectangles

use crate::line::Line;
use crate::surface::{Color, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle spanned by two arbitrary corner points.
///
/// The corners are combined per axis, so `start` does not have to be the
/// top-left corner. `left <= right` and `top <= bottom` hold for any input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    lt: Point,
    rt: Point,
    lb: Point,
    rb: Point,
}

impl Rect {
    pub fn new(start: Point, end: Point) -> Self {
        let (left, right) = if start.x <= end.x { (start.x, end.x) } else { (end.x, start.x) };
        let (top, bottom) = if start.y <= end.y { (start.y, end.y) } else { (end.y, start.y) };
        Rect {
            lt: Point::new(left, top),
            rt: Point::new(right, top),
            lb: Point::new(left, bottom),
            rb: Point::new(right, bottom),
        }
    }

    /// Rectangle from a top-left origin and a size
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect::new(Point::new(x, y), Point::new(x + width, y + height))
    }

    pub fn top_left(&self) -> Point {
        self.lt
    }

    pub fn top_right(&self) -> Point {
        self.rt
    }

    pub fn bottom_left(&self) -> Point {
        self.lb
    }

    pub fn bottom_right(&self) -> Point {
        self.rb
    }

    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    pub fn top(&self) -> f64 {
        self.lt.y.min(self.lb.y)
    }

    pub fn bottom(&self) -> f64 {
        self.lt.y.max(self.lb.y)
    }

    pub fn left(&self) -> f64 {
        self.lt.x.min(self.rt.x)
    }

    pub fn right(&self) -> f64 {
        self.lt.x.max(self.rt.x)
    }

    /// Overlap test where shared edges count as overlapping.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.left() > self.right()
            || other.right() < self.left()
            || other.top() > self.bottom()
            || other.bottom() < self.top())
    }

    /// Strokes the outline TL -> TR -> BR -> BL -> close through `line`.
    pub fn draw_frame<S: Surface + ?Sized>(&self, line: &mut Line<'_, S>) {
        line.begin_path();
        line.move_to(self.lt.x, self.lt.y);
        line.line_to(self.rt.x, self.rt.y);
        line.line_to(self.rb.x, self.rb.y);
        line.line_to(self.lb.x, self.lb.y);
        line.close_path();
        line.stroke();
    }

    pub fn fill<S: Surface + ?Sized>(&self, surface: &mut S, color: Color, opacity: f64) {
        surface.set_global_alpha(opacity);
        surface.set_fill_style(color);
        surface.fill_rect(self.left(), self.top(), self.width(), self.height());
    }
}
