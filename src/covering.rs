//! Committed coverings and the commit/conflict protocol

use crate::geometry::{Point, Rect};
use crate::grid::{CellRange, GridIndexer};

/// A finished selection snapped to cell boundaries.
///
/// The rect runs from the first cell's top-left corner to the last cell's
/// bottom-right corner plus one stroke width, so the grid lines along the
/// right and bottom edges are painted over as well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Covering {
    range: CellRange,
    rect: Rect,
}

impl Covering {
    pub fn snap(range: CellRange, indexer: &GridIndexer, stroke_width: f64) -> Option<Covering> {
        if range.is_empty() {
            return None;
        }
        let first = indexer.cell_bounds(range.start);
        let last = indexer.cell_bounds(range.end);
        let rect = Rect::new(
            first.top_left(),
            Point::new(last.right() + stroke_width, last.bottom() + stroke_width),
        );
        Some(Covering { range, rect })
    }

    pub fn range(&self) -> CellRange {
        self.range
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Appended at `index` in commit order
    Committed { index: usize },
    /// Overlaps the covering at `with`; nothing changed
    Conflict { with: usize },
    /// The selection covered no cells
    Empty,
}

/// Coverings in commit order. Members never overlap each other.
#[derive(Debug, Clone, Default)]
pub struct CoveringSet {
    coverings: Vec<Covering>,
}

impl CoveringSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.coverings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coverings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Covering> {
        self.coverings.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Covering> {
        self.coverings.iter()
    }

    /// Index of the first covering that `rect` overlaps
    pub fn conflicts_with(&self, rect: &Rect) -> Option<usize> {
        self.coverings.iter().position(|c| c.rect.intersects(rect))
    }

    /// One `rows a-b, cols c-d` line per covering
    pub fn describe(&self) -> String {
        self.coverings
            .iter()
            .map(|c| c.range.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a CoveringSet {
    type Item = &'a Covering;
    type IntoIter = std::slice::Iter<'a, Covering>;

    fn into_iter(self) -> Self::IntoIter {
        self.coverings.iter()
    }
}

/// Appends `candidate` unless it is missing or overlaps an existing covering.
pub fn try_commit_covering(set: &mut CoveringSet, candidate: Option<Covering>) -> CommitOutcome {
    let Some(covering) = candidate else {
        return CommitOutcome::Empty;
    };
    if let Some(with) = set.conflicts_with(&covering.rect) {
        log::debug!("covering {} rejected: overlaps covering #{with}", covering.range);
        return CommitOutcome::Conflict { with };
    }
    set.coverings.push(covering);
    let index = set.coverings.len() - 1;
    log::info!("committed covering #{index}: {}", covering.range);
    CommitOutcome::Committed { index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellIndex;

    fn indexer() -> GridIndexer {
        GridIndexer::new(10.0, 5.0, 200)
    }

    fn covering(r0: i64, c0: i64, r1: i64, c1: i64) -> Option<Covering> {
        let range = CellRange::new(CellIndex::new(r0, c0), CellIndex::new(r1, c1));
        Covering::snap(range, &indexer(), 1.0)
    }

    #[test]
    fn test_snap_extends_by_stroke_width() {
        let c = covering(0, 0, 1, 1).unwrap();
        assert_eq!(c.rect().left(), 0.0);
        assert_eq!(c.rect().top(), 0.0);
        assert_eq!(c.rect().right(), 26.0);
        assert_eq!(c.rect().bottom(), 26.0);

        let c = covering(2, 3, 2, 3).unwrap();
        assert_eq!(c.rect().left(), 45.0);
        assert_eq!(c.rect().top(), 30.0);
        assert_eq!(c.rect().width(), 11.0);
    }

    #[test]
    fn test_snap_empty_range() {
        assert!(Covering::snap(CellRange::EMPTY, &indexer(), 1.0).is_none());
        let mut set = CoveringSet::new();
        assert_eq!(try_commit_covering(&mut set, None), CommitOutcome::Empty);
        assert!(set.is_empty());
    }

    #[test]
    fn test_disjoint_coverings_commit_in_order() {
        let mut set = CoveringSet::new();
        let a = covering(0, 0, 1, 1);
        let b = covering(0, 2, 3, 4);
        assert_eq!(try_commit_covering(&mut set, a), CommitOutcome::Committed { index: 0 });
        assert_eq!(try_commit_covering(&mut set, b), CommitOutcome::Committed { index: 1 });
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).copied(), a);
        assert_eq!(set.get(1).copied(), b);
        assert_eq!(set.describe(), "rows 0-1, cols 0-1\nrows 0-3, cols 2-4");
    }

    #[test]
    fn test_overlapping_covering_is_rejected() {
        let mut set = CoveringSet::new();
        try_commit_covering(&mut set, covering(0, 0, 2, 2));
        try_commit_covering(&mut set, covering(5, 5, 6, 6));

        let overlapping = covering(6, 6, 8, 8);
        assert_eq!(
            try_commit_covering(&mut set, overlapping),
            CommitOutcome::Conflict { with: 1 }
        );
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|c| Some(*c) != overlapping));
    }

    #[test]
    fn test_adjacent_cells_do_not_conflict() {
        let mut set = CoveringSet::new();
        try_commit_covering(&mut set, covering(0, 0, 0, 0));
        assert_eq!(
            try_commit_covering(&mut set, covering(0, 1, 0, 1)),
            CommitOutcome::Committed { index: 1 }
        );
        assert_eq!(
            try_commit_covering(&mut set, covering(1, 0, 1, 1)),
            CommitOutcome::Committed { index: 2 }
        );
    }

    #[test]
    fn test_members_never_overlap() {
        let mut set = CoveringSet::new();
        for (r0, c0, r1, c1) in [(0, 0, 3, 3), (2, 2, 5, 5), (4, 0, 4, 9), (0, 4, 2, 9), (3, 4, 3, 4)] {
            try_commit_covering(&mut set, covering(r0, c0, r1, c1));
        }
        let all: Vec<_> = set.iter().collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(!a.rect().intersects(b.rect()));
            }
        }
    }
}
