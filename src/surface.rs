//! Drawing surface capability consumed by the grid widget
//!
//! The widget never talks to a toolkit directly. Hosts hand it something
//! implementing [`Surface`] (a piet render context, or the software
//! [`PixelSurface`](crate::pixels::PixelSurface)).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Flat RGB color. Opacity is passed separately as global alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Packs into the `0x00RRGGBB` layout used by pixel buffers
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub const fn from_u32(pix: u32) -> Self {
        Color {
            r: ((pix >> 16) & 0xFF) as u8,
            g: ((pix >> 8) & 0xFF) as u8,
            b: (pix & 0xFF) as u8,
        }
    }

    /// `self` painted over `dst` at opacity `alpha`
    pub fn blend_over(self, dst: Color, alpha: f64) -> Color {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |s: u8, d: u8| (s as f64 * a + d as f64 * (1.0 - a)).round() as u8;
        Color {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        anyhow::ensure!(
            hex.len() == 6 && hex.is_ascii(),
            "expected a #rrggbb color, got {s:?}"
        );
        let value = u32::from_str_radix(hex, 16)
            .map_err(|e| anyhow::anyhow!("invalid color {s:?}: {e}"))?;
        Ok(Color::from_u32(value))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

/// Canvas-style immediate drawing target.
///
/// State setters persist until changed, like a 2D canvas context.
pub trait Surface {
    /// Pre-rendered image that can be blitted with [`Surface::draw_layer`]
    type Layer;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn set_stroke_style(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_fill_style(&mut self, color: Color);
    fn set_global_alpha(&mut self, alpha: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn stroke(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Wipes the whole surface back to its background color
    fn clear(&mut self);

    /// Blits `layer` at the origin
    fn draw_layer(&mut self, layer: &Self::Layer);
}
