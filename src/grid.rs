//! The static cube matrix and pixel-to-cell index mapping

use std::fmt;

use crate::geometry::{Point, Rect};
use crate::line::Line;
use crate::surface::Surface;

/// Rounding policy for a selection corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Top-left corner: a point in the gutter rounds forward to the next cell
    Lower,
    /// Bottom-right corner: a point in the gutter stays on the cell before it
    Upper,
}

/// Cell coordinates. Signed because mapped points may lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    pub row: i64,
    pub col: i64,
}

impl CellIndex {
    pub const fn new(row: i64, col: i64) -> Self {
        CellIndex { row, col }
    }
}

/// Inclusive `[start, end]` block of cells; empty when `start > end` on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellIndex,
    pub end: CellIndex,
}

impl CellRange {
    pub const EMPTY: CellRange = CellRange {
        start: CellIndex::new(0, 0),
        end: CellIndex::new(-1, -1),
    };

    pub const fn new(start: CellIndex, end: CellIndex) -> Self {
        CellRange { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.row > self.end.row || self.start.col > self.end.col
    }

    pub fn rows(&self) -> usize {
        (self.end.row - self.start.row + 1).max(0) as usize
    }

    pub fn cols(&self) -> usize {
        (self.end.col - self.start.col + 1).max(0) as usize
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.rows() * self.cols()
        }
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        (self.start.row..=self.end.row).contains(&index.row)
            && (self.start.col..=self.end.col).contains(&index.col)
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        let cols = if self.is_empty() { 0..0 } else { self.start.col..self.end.col + 1 };
        (self.start.row..=self.end.row)
            .flat_map(move |row| cols.clone().map(move |col| CellIndex::new(row, col)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }
        write!(
            f,
            "rows {}-{}, cols {}-{}",
            self.start.row, self.end.row, self.start.col, self.end.col
        )
    }
}

/// Pure mapping between pixel space and cell indices.
///
/// Along each axis cell `i` spans `[i * pitch, i * pitch + cell_size]`, and the
/// `gap` pixels after it are gutter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridIndexer {
    pub cell_size: f64,
    pub gap: f64,
    pub cells: usize,
}

impl GridIndexer {
    pub fn new(cell_size: f64, gap: f64, cells: usize) -> Self {
        GridIndexer {
            cell_size,
            gap,
            cells,
        }
    }

    pub fn pitch(&self) -> f64 {
        self.cell_size + self.gap
    }

    /// Leading edge of cell `k` along an axis
    fn cell_start(&self, k: i64) -> f64 {
        k as f64 * self.pitch()
    }

    /// Trailing edge of cell `k`, computed exactly as [`Self::cell_bounds`] does
    fn cell_end(&self, k: i64) -> f64 {
        self.cell_start(k) + self.cell_size
    }

    /// Last cell whose leading edge is at or before `coord`. The division
    /// only seeds the search; the edges decide, so a pitch like 12.2 that
    /// has no exact binary form still agrees with `cell_bounds`.
    fn floor_index(&self, coord: f64) -> i64 {
        let mut k = (coord / self.pitch()).floor().clamp(-1e15, 1e15) as i64;
        if !coord.is_finite() {
            return k;
        }
        while self.cell_start(k) > coord {
            k -= 1;
        }
        while self.cell_start(k + 1) <= coord {
            k += 1;
        }
        k
    }

    /// True when `coord` lies strictly past a cell's far edge. The far edge
    /// itself still belongs to the cell.
    pub fn is_in_gutter(&self, coord: f64) -> bool {
        coord > self.cell_end(self.floor_index(coord))
    }

    pub fn axis_index(&self, coord: f64, bound: Bound) -> i64 {
        let base = self.floor_index(coord);
        match bound {
            Bound::Upper => base,
            Bound::Lower if !coord.is_finite() => base,
            Bound::Lower => {
                let mut k = if coord > self.cell_end(base) { base + 1 } else { base };
                while self.cell_end(k - 1) >= coord {
                    k -= 1;
                }
                k
            }
        }
    }

    pub fn index_at(&self, point: Point, bound: Bound) -> CellIndex {
        CellIndex::new(self.axis_index(point.y, bound), self.axis_index(point.x, bound))
    }

    /// Cells touched by `rect`, clipped to the grid.
    pub fn range_of(&self, rect: &Rect) -> CellRange {
        let lower = self.index_at(rect.top_left(), Bound::Lower);
        let upper = self.index_at(rect.bottom_right(), Bound::Upper);
        let last = self.cells as i64 - 1;
        CellRange::new(
            CellIndex::new(lower.row.max(0), lower.col.max(0)),
            CellIndex::new(upper.row.min(last), upper.col.min(last)),
        )
    }

    pub fn cell_bounds(&self, index: CellIndex) -> Rect {
        Rect::from_origin_size(
            self.cell_start(index.col),
            self.cell_start(index.row),
            self.cell_size,
            self.cell_size,
        )
    }
}

/// `cells x cells` matrix of cube rects, row-major. Never changes after construction.
#[derive(Debug, Clone)]
pub struct Grid {
    indexer: GridIndexer,
    cells: Vec<Rect>,
}

impl Grid {
    pub fn new(indexer: GridIndexer) -> Self {
        let n = indexer.cells;
        let mut cells = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                cells.push(indexer.cell_bounds(CellIndex::new(row as i64, col as i64)));
            }
        }
        Grid { indexer, cells }
    }

    pub fn indexer(&self) -> &GridIndexer {
        &self.indexer
    }

    /// Cells per axis
    pub fn dimension(&self) -> usize {
        self.indexer.cells
    }

    pub fn cell(&self, index: CellIndex) -> Option<&Rect> {
        let n = self.indexer.cells;
        let row = usize::try_from(index.row).ok().filter(|&r| r < n)?;
        let col = usize::try_from(index.col).ok().filter(|&c| c < n)?;
        self.cells.get(row * n + col)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, &Rect)> {
        let n = self.indexer.cells;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, rect)| (CellIndex::new((i / n) as i64, (i % n) as i64), rect))
    }

    /// Brute-force scan for every cell `rect` intersects. Matches
    /// [`GridIndexer::range_of`] but costs O(cells).
    pub fn cells_intersecting(&self, rect: &Rect) -> Vec<CellIndex> {
        self.iter()
            .filter(|(_, cell)| rect.intersects(cell))
            .map(|(index, _)| index)
            .collect()
    }

    /// Strokes every cell frame once
    pub fn draw<S: Surface + ?Sized>(&self, line: &mut Line<'_, S>) {
        for cell in &self.cells {
            cell.draw_frame(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexer() -> GridIndexer {
        GridIndexer::new(10.0, 5.0, 200)
    }

    fn drag(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn test_gutter_predicate_boundaries() {
        let ix = indexer();
        assert!(!ix.is_in_gutter(0.0));
        assert!(!ix.is_in_gutter(9.0));
        assert!(!ix.is_in_gutter(10.0));
        assert!(ix.is_in_gutter(10.5));
        assert!(ix.is_in_gutter(14.0));
        assert!(ix.is_in_gutter(14.99));
        assert!(!ix.is_in_gutter(15.0));
        assert!(!ix.is_in_gutter(25.0));
        assert!(ix.is_in_gutter(-1.0));
        assert!(!ix.is_in_gutter(-5.0));
    }

    #[test]
    fn test_cell_top_left_maps_to_itself() {
        let ix = indexer();
        for row in [0, 1, 7, 53, 199] {
            for col in [0, 2, 31, 199] {
                let index = CellIndex::new(row, col);
                let tl = ix.cell_bounds(index).top_left();
                assert_eq!(ix.index_at(tl, Bound::Lower), index);
                assert_eq!(ix.index_at(tl, Bound::Upper), index);
            }
        }
    }

    #[test]
    fn test_gutter_point_rounds_by_bound() {
        let ix = indexer();
        // between (3, 4) and (3, 5): x in (70, 75), y inside row 3
        let p = Point::new(72.0, 48.0);
        assert_eq!(ix.index_at(p, Bound::Lower), CellIndex::new(3, 5));
        assert_eq!(ix.index_at(p, Bound::Upper), CellIndex::new(3, 4));
    }

    #[test]
    fn test_trailing_edge_belongs_to_cell() {
        let ix = indexer();
        assert_eq!(ix.axis_index(25.0, Bound::Upper), 1);
        assert_eq!(ix.axis_index(25.0, Bound::Lower), 1);
    }

    #[test]
    fn test_zero_size_drag_is_one_cell() {
        let range = indexer().range_of(&drag(2.0, 2.0, 2.0, 2.0));
        assert_eq!(range, CellRange::new(CellIndex::new(0, 0), CellIndex::new(0, 0)));
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_drag_across_two_cells() {
        let range = indexer().range_of(&drag(3.0, 3.0, 17.0, 17.0));
        assert_eq!(range, CellRange::new(CellIndex::new(0, 0), CellIndex::new(1, 1)));
        assert_eq!(range.len(), 4);
        let cells: Vec<_> = range.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellIndex::new(0, 0),
                CellIndex::new(0, 1),
                CellIndex::new(1, 0),
                CellIndex::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_reversed_drag_gives_same_range() {
        let ix = indexer();
        assert_eq!(
            ix.range_of(&drag(17.0, 17.0, 3.0, 3.0)),
            ix.range_of(&drag(3.0, 3.0, 17.0, 17.0))
        );
    }

    #[test]
    fn test_drag_inside_gutter_is_empty() {
        let range = indexer().range_of(&drag(11.0, 2.0, 13.0, 4.0));
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.cells().count(), 0);
        assert_eq!(range.to_string(), "empty");
    }

    #[test]
    fn test_range_is_clipped_to_grid() {
        let ix = GridIndexer::new(10.0, 5.0, 3);
        let range = ix.range_of(&drag(-30.0, -30.0, 500.0, 500.0));
        assert_eq!(range, CellRange::new(CellIndex::new(0, 0), CellIndex::new(2, 2)));

        // past the last cell's gutter
        assert!(ix.range_of(&drag(42.0, 0.0, 60.0, 5.0)).is_empty());
        assert!(ix.range_of(&drag(-20.0, -20.0, -2.0, -2.0)).is_empty());
    }

    #[test]
    fn test_range_matches_intersect_scan() {
        let ix = GridIndexer::new(10.0, 5.0, 6);
        let grid = Grid::new(ix);
        let coords = [-3.0, 0.0, 2.0, 10.0, 10.5, 12.0, 15.0, 24.0, 25.0, 27.5, 44.0, 89.0, 95.0];
        for &x0 in &coords {
            for &x1 in &coords {
                for &(y0, y1) in &[(0.0, 0.0), (11.0, 13.0), (10.0, 30.0), (-1.0, 96.0)] {
                    let sel = drag(x0, y0, x1, y1);
                    let fast: Vec<_> = ix.range_of(&sel).cells().collect();
                    assert_eq!(fast, grid.cells_intersecting(&sel), "{sel:?}");
                }
            }
        }
    }

    #[test]
    fn test_fractional_pitch_edges_match_intersect_scan() {
        for (size, gap) in [(10.0, 2.2), (7.3, 1.1), (9.9, 0.7)] {
            let ix = GridIndexer::new(size, gap, 8);
            let grid = Grid::new(ix);
            let mut coords = Vec::new();
            for k in -1..=8 {
                let cell = ix.cell_bounds(CellIndex::new(0, k));
                coords.extend([cell.left(), cell.right(), cell.right() + gap / 2.0]);
            }
            for &a in &coords {
                for &b in &coords {
                    let sel = drag(a, 0.0, b, 0.0);
                    let fast: Vec<_> = ix.range_of(&sel).cells().collect();
                    assert_eq!(fast, grid.cells_intersecting(&sel), "({size}, {gap}) {sel:?}");
                }
            }
        }
    }

    #[test]
    fn test_fractional_pitch_trailing_edge_click() {
        let ix = GridIndexer::new(10.0, 2.2, 8);
        // cell 5 spans 61..=71
        assert!(!ix.is_in_gutter(71.0));
        assert_eq!(
            ix.range_of(&drag(71.0, 0.0, 71.0, 0.0)),
            CellRange::new(CellIndex::new(0, 5), CellIndex::new(0, 5))
        );
        for k in 0..8 {
            let tl = ix.cell_bounds(CellIndex::new(k, k)).top_left();
            assert_eq!(ix.index_at(tl, Bound::Lower), CellIndex::new(k, k));
        }
    }

    #[test]
    fn test_grid_layout() {
        let grid = Grid::new(GridIndexer::new(10.0, 5.0, 4));
        assert_eq!(grid.dimension(), 4);
        assert_eq!(grid.iter().count(), 16);
        let cell = grid.cell(CellIndex::new(2, 1)).unwrap();
        assert_eq!(cell.left(), 15.0);
        assert_eq!(cell.right(), 25.0);
        assert_eq!(cell.top(), 30.0);
        assert_eq!(cell.bottom(), 40.0);
        assert!(grid.cell(CellIndex::new(4, 0)).is_none());
        assert!(grid.cell(CellIndex::new(0, -1)).is_none());
    }

    #[test]
    fn test_range_display() {
        let range = CellRange::new(CellIndex::new(1, 2), CellIndex::new(3, 4));
        assert_eq!(range.to_string(), "rows 1-3, cols 2-4");
        assert!(range.contains(CellIndex::new(2, 4)));
        assert!(!range.contains(CellIndex::new(0, 2)));
        assert_eq!(range.rows(), 3);
        assert_eq!(range.cols(), 3);
    }
}
