//! Drag-to-select cube grid.
//!
//! A fixed matrix of small square cells is drawn once onto a background
//! layer. Dragging over it highlights every cell the selection frame touches,
//! and releasing commits a covering snapped to those cells unless it would
//! overlap an earlier one.
//!
//! The core is toolkit-free: hosts feed [`PointerEvent`]s into a [`Panel`]
//! and hand it a [`Surface`] to render onto.

pub mod config;
pub mod covering;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod line;
pub mod panel;
pub mod pixels;
pub mod selection;
pub mod surface;

pub use config::GridConfig;
pub use covering::{CommitOutcome, Covering, CoveringSet};
pub use geometry::{Point, Rect};
pub use grid::{Bound, CellIndex, CellRange, Grid, GridIndexer};
pub use panel::{Panel, PointerEvent, Response};
pub use pixels::PixelSurface;
pub use surface::{Color, LineJoin, Surface};
