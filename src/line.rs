//! Stroke wrapper that shifts every coordinate onto pixel centers

use crate::surface::{Color, LineJoin, Surface};

/// Half-pixel shift that makes 1px strokes land on exactly one pixel row/column
pub const CRISP_OFFSET: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOptions {
    pub offset: f64,
    pub line_width: f64,
    pub line_join: LineJoin,
    pub stroke_style: Color,
}

impl LineOptions {
    /// 1px round-joined stroke through pixel centers
    pub fn crisp(stroke_style: Color, line_width: f64) -> Self {
        LineOptions {
            offset: CRISP_OFFSET,
            line_width,
            line_join: LineJoin::Round,
            stroke_style,
        }
    }
}

/// Borrows a surface, configures its stroke state, and offsets every
/// `move_to`/`line_to` by a fixed amount.
pub struct Line<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    offset: f64,
}

impl<'a, S: Surface + ?Sized> Line<'a, S> {
    pub fn new(surface: &'a mut S, options: LineOptions) -> Self {
        surface.set_line_width(options.line_width);
        surface.set_line_join(options.line_join);
        surface.set_stroke_style(options.stroke_style);
        Line {
            surface,
            offset: options.offset,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.surface.move_to(x + self.offset, y + self.offset);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.surface.line_to(x + self.offset, y + self.offset);
    }

    pub fn begin_path(&mut self) {
        self.surface.begin_path();
    }

    pub fn close_path(&mut self) {
        self.surface.close_path();
    }

    pub fn stroke(&mut self) {
        self.surface.stroke();
    }
}
