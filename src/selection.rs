//! Drag tracking only; drawing lives in the panel.

use crate::geometry::{Point, Rect};
use crate::grid::{CellRange, GridIndexer};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { start: Point, current: Point },
}

/// Selection frame state between pointer-down and pointer-up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    state: DragState,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Starts a drag; pressing again mid-drag restarts it from `at`
    pub fn press(&mut self, at: Point) {
        self.state = DragState::Dragging { start: at, current: at };
    }

    /// Returns false when idle
    pub fn drag_to(&mut self, at: Point) -> bool {
        match &mut self.state {
            DragState::Dragging { current, .. } => {
                *current = at;
                true
            }
            DragState::Idle => false,
        }
    }

    /// Ends the drag and returns the final frame, or `None` if no drag was active
    pub fn release(&mut self, at: Point) -> Option<Rect> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { start, .. } => Some(Rect::new(start, at)),
            DragState::Idle => None,
        }
    }

    /// Current frame while dragging
    pub fn frame(&self) -> Option<Rect> {
        match self.state {
            DragState::Dragging { start, current } => Some(Rect::new(start, current)),
            DragState::Idle => None,
        }
    }
}

/// Cells to highlight (or cover) for a selection frame
pub fn compute_selection_range(indexer: &GridIndexer, frame: &Rect) -> CellRange {
    indexer.range_of(frame)
}
