//! Software raster surface over a `0x00RRGGBB` pixel buffer
//!
//! Pixel `(px, py)` covers `[px, px+1) x [py, py+1)` and is sampled at its
//! center. Both hosts consume this buffer: minifb takes it as-is, druid turns
//! it into a cached image, and the PNG export converts it to RGBA.

use image::{Rgba, RgbaImage};

use crate::surface::{Color, LineJoin, Surface};

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
struct Subpath {
    points: Vec<(f64, f64)>,
    closed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    buffer: Vec<u32>,
    background: Color,
    stroke_style: Color,
    line_width: f64,
    fill_style: Color,
    alpha: f64,
    path: Vec<Subpath>,
}

impl PixelSurface {
    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        PixelSurface {
            width,
            height,
            buffer: vec![background.to_u32(); width as usize * height as usize],
            background,
            stroke_style: Color::BLACK,
            line_width: 1.0,
            fill_style: Color::BLACK,
            alpha: 1.0,
            path: Vec::new(),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color::from_u32(self.buffer[self.index(x, y)]))
    }

    /// Raw `0x00RRGGBB` pixels, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.buffer
    }

    /// Opaque RGBA bytes, row-major
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.buffer.len() * 4);
        for &pix in &self.buffer {
            let c = Color::from_u32(pix);
            out.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
        out
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = Color::from_u32(self.buffer[self.index(x, y)]);
            Rgba([c.r, c.g, c.b, 255])
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn blend(&mut self, idx: usize, color: Color) {
        let dst = Color::from_u32(self.buffer[idx]);
        self.buffer[idx] = color.blend_over(dst, self.alpha).to_u32();
    }

    /// Half-open pixel span whose centers fall inside `[lo, hi)` on an axis
    fn center_span(lo: f64, hi: f64, limit: u32) -> (u32, u32) {
        let clip = |v: f64| v.clamp(0.0, limit as f64) as u32;
        (clip((lo - 0.5).ceil()), clip((hi - 0.5).ceil()))
    }

    fn segments(&self) -> Vec<((f64, f64), (f64, f64))> {
        let mut out = Vec::new();
        for sub in &self.path {
            if sub.points.len() == 1 {
                out.push((sub.points[0], sub.points[0]));
            }
            for pair in sub.points.windows(2) {
                out.push((pair[0], pair[1]));
            }
            if sub.closed && sub.points.len() > 2 {
                out.push((sub.points[sub.points.len() - 1], sub.points[0]));
            }
        }
        out
    }

    /// Pixel indices whose centers lie within `half` of the segment
    fn cover_segment(&self, a: (f64, f64), b: (f64, f64), half: f64, hits: &mut Vec<usize>) {
        let (x_lo, x_hi) = Self::center_span(a.0.min(b.0) - half, a.0.max(b.0) + half + 1.0, self.width);
        let (y_lo, y_hi) = Self::center_span(a.1.min(b.1) - half, a.1.max(b.1) + half + 1.0, self.height);
        for py in y_lo..y_hi {
            for px in x_lo..x_hi {
                let center = (px as f64 + 0.5, py as f64 + 0.5);
                if distance_to_segment(center, a, b) <= half + EPSILON {
                    hits.push(self.index(px, py));
                }
            }
        }
    }
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

impl Surface for PixelSurface {
    type Layer = PixelSurface;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.stroke_style = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    // distance-based strokes always come out with round joins
    fn set_line_join(&mut self, _join: LineJoin) {
    }

    fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(Subpath {
            points: vec![(x, y)],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        match self.path.last_mut() {
            Some(sub) if !sub.closed => sub.points.push((x, y)),
            _ => self.move_to(x, y),
        }
    }

    fn close_path(&mut self) {
        if let Some(sub) = self.path.last_mut() {
            sub.closed = true;
        }
    }

    fn stroke(&mut self) {
        let half = self.line_width / 2.0;
        let mut hits = Vec::new();
        for (a, b) in self.segments() {
            self.cover_segment(a, b, half, &mut hits);
        }
        // joins are covered by both adjacent segments; blend each pixel once
        hits.sort_unstable();
        hits.dedup();
        let color = self.stroke_style;
        for idx in hits {
            self.blend(idx, color);
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x0, x1) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
        let (y0, y1) = if height < 0.0 { (y + height, y) } else { (y, y + height) };
        let (px_lo, px_hi) = Self::center_span(x0, x1, self.width);
        let (py_lo, py_hi) = Self::center_span(y0, y1, self.height);
        let color = self.fill_style;
        for py in py_lo..py_hi {
            for px in px_lo..px_hi {
                let idx = self.index(px, py);
                self.blend(idx, color);
            }
        }
    }

    fn clear(&mut self) {
        let bg = self.background.to_u32();
        self.buffer.fill(bg);
    }

    fn draw_layer(&mut self, layer: &PixelSurface) {
        let w = self.width.min(layer.width) as usize;
        let h = self.height.min(layer.height);
        for y in 0..h {
            let dst = self.index(0, y);
            let src = layer.index(0, y);
            if self.alpha >= 1.0 {
                self.buffer[dst..dst + w].copy_from_slice(&layer.buffer[src..src + w]);
            } else {
                for x in 0..w {
                    self.blend(dst + x, Color::from_u32(layer.buffer[src + x]));
                }
            }
        }
    }
}
