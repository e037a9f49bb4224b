//! The cube panel: owns the grid, the coverings and the drag, and redraws
//! them in layers.

use anyhow::Result;

use crate::config::GridConfig;
use crate::covering::{CommitOutcome, Covering, CoveringSet, try_commit_covering};
use crate::geometry::{Point, Rect};
use crate::grid::{CellRange, Grid, GridIndexer};
use crate::line::{Line, LineOptions};
use crate::pixels::PixelSurface;
use crate::selection::{Selection, compute_selection_range};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release(Point),
}

/// What the host should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    pub redraw: bool,
    /// Set on release of an active drag
    pub outcome: Option<CommitOutcome>,
}

pub struct Panel {
    config: GridConfig,
    grid: Grid,
    coverings: CoveringSet,
    selection: Selection,
    background: PixelSurface,
}

impl Panel {
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.indexer());
        let background = draw_background(&grid, &config);
        log::debug!(
            "panel ready: {0}x{0} cells on a {1}x{2} surface",
            config.cells,
            config.surface_width,
            config.surface_height
        );
        Ok(Panel {
            config,
            grid,
            coverings: CoveringSet::new(),
            selection: Selection::new(),
            background,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn indexer(&self) -> &GridIndexer {
        self.grid.indexer()
    }

    pub fn coverings(&self) -> &CoveringSet {
        &self.coverings
    }

    /// Grid lines, rasterized once at construction
    pub fn background(&self) -> &PixelSurface {
        &self.background
    }

    pub fn is_dragging(&self) -> bool {
        self.selection.is_dragging()
    }

    pub fn selection_frame(&self) -> Option<Rect> {
        self.selection.frame()
    }

    /// Cells under the current drag; empty when idle
    pub fn highlighted(&self) -> CellRange {
        self.selection
            .frame()
            .map(|frame| compute_selection_range(self.indexer(), &frame))
            .unwrap_or(CellRange::EMPTY)
    }

    pub fn handle(&mut self, event: PointerEvent) -> Response {
        match event {
            PointerEvent::Press(at) => {
                self.selection.press(at);
                Response { redraw: true, outcome: None }
            }
            PointerEvent::Move(at) => Response {
                redraw: self.selection.drag_to(at),
                outcome: None,
            },
            PointerEvent::Release(at) => match self.selection.release(at) {
                Some(frame) => Response {
                    redraw: true,
                    outcome: Some(self.commit(&frame)),
                },
                None => Response::default(),
            },
        }
    }

    fn commit(&mut self, frame: &Rect) -> CommitOutcome {
        let range = compute_selection_range(self.indexer(), frame);
        let candidate = Covering::snap(range, self.indexer(), self.config.stroke_width);
        try_commit_covering(&mut self.coverings, candidate)
    }

    /// Background, then coverings, then the drag overlay if one is active.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, background: &S::Layer) {
        surface.clear();
        surface.set_global_alpha(1.0);
        surface.draw_layer(background);

        for covering in &self.coverings {
            covering
                .rect()
                .fill(surface, self.config.covering_color, self.config.covering_opacity);
        }

        if let Some(frame) = self.selection.frame() {
            surface.set_global_alpha(1.0);
            let options = LineOptions::crisp(self.config.selection_color, self.config.stroke_width);
            frame.draw_frame(&mut Line::new(surface, options));

            for index in compute_selection_range(self.indexer(), &frame).cells() {
                if let Some(cell) = self.grid.cell(index) {
                    cell.fill(surface, self.config.highlight_color, self.config.highlight_opacity);
                }
            }
        }
    }

    /// Current state rendered into a fresh pixel surface
    pub fn snapshot(&self) -> PixelSurface {
        let mut surface = self.background.clone();
        self.render(&mut surface, &self.background);
        surface
    }
}

fn draw_background(grid: &Grid, config: &GridConfig) -> PixelSurface {
    let mut surface = PixelSurface::with_background(
        config.surface_width,
        config.surface_height,
        config.background_color,
    );
    let mut line = Line::new(&mut surface, LineOptions::crisp(config.grid_color, config.stroke_width));
    grid.draw(&mut line);
    surface
}
