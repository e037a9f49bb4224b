//! Piet-backed surface for the druid host

use cubegrid::{Color, LineJoin, Surface};
use druid::kurbo::{BezPath, Rect};
use druid::piet::{self, InterpolationMode, RenderContext, StrokeStyle};

/// [`Surface`] over a piet render context. Path ops build a `BezPath` that is
/// handed to piet on `stroke`.
pub struct PietSurface<'a, R: RenderContext> {
    ctx: &'a mut R,
    width: f64,
    height: f64,
    background: Color,
    path: BezPath,
    stroke_style: Color,
    line_width: f64,
    line_join: LineJoin,
    fill_style: Color,
    alpha: f64,
}

impl<'a, R: RenderContext> PietSurface<'a, R> {
    pub fn new(ctx: &'a mut R, width: f64, height: f64, background: Color) -> Self {
        PietSurface {
            ctx,
            width,
            height,
            background,
            path: BezPath::new(),
            stroke_style: Color::BLACK,
            line_width: 1.0,
            line_join: LineJoin::Round,
            fill_style: Color::BLACK,
            alpha: 1.0,
        }
    }

    fn brush(&self, color: Color) -> piet::Color {
        piet::Color::rgba8(color.r, color.g, color.b, (self.alpha * 255.0).round() as u8)
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

fn piet_join(join: LineJoin) -> piet::LineJoin {
    match join {
        LineJoin::Round => piet::LineJoin::Round,
        LineJoin::Bevel => piet::LineJoin::Bevel,
        LineJoin::Miter => piet::LineJoin::Miter {
            limit: piet::LineJoin::DEFAULT_MITER_LIMIT,
        },
    }
}

impl<R: RenderContext> Surface for PietSurface<'_, R> {
    type Layer = R::Image;

    fn width(&self) -> u32 {
        self.width as u32
    }

    fn height(&self) -> u32 {
        self.height as u32
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.stroke_style = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to((x, y));
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

    fn stroke(&mut self) {
        let brush = self.brush(self.stroke_style);
        let style = StrokeStyle::new().line_join(piet_join(self.line_join));
        self.ctx
            .stroke_styled(&self.path, &brush, self.line_width, &style);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let brush = self.brush(self.fill_style);
        self.ctx
            .fill(Rect::new(x, y, x + width, y + height).abs(), &brush);
    }

    fn clear(&mut self) {
        let bg = self.background;
        let bounds = self.bounds();
        self.ctx
            .clear(bounds, piet::Color::rgb8(bg.r, bg.g, bg.b));
    }

    fn draw_layer(&mut self, layer: &R::Image) {
        if self.alpha < 1.0 {
            log::debug!("piet layers are drawn opaque; ignoring alpha {}", self.alpha);
        }
        let bounds = self.bounds();
        self.ctx
            .draw_image(layer, bounds, InterpolationMode::NearestNeighbor);
    }
}
