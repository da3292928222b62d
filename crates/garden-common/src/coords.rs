//! Grid coordinate types for the garden plot layout.

use serde::{Deserialize, Serialize};

use crate::ids::PlotId;

/// Row/column position on a rectangular plot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Row (0 = top)
    pub row: i32,
    /// Column (0 = left)
    pub col: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Converts a plot id to its coordinate on a grid `width` columns wide.
    #[must_use]
    pub const fn from_plot(id: PlotId, width: u32) -> Self {
        let index = id.index() as i32;
        let width = width as i32;
        Self {
            row: index / width,
            col: index % width,
        }
    }

    /// Converts back to a plot id, or `None` when outside a `width`×`height` grid.
    #[must_use]
    pub const fn to_plot(self, width: u32, height: u32) -> Option<PlotId> {
        if !self.is_within(width, height) {
            return None;
        }
        Some(PlotId::new((self.row as usize) * (width as usize) + self.col as usize))
    }

    /// Checks whether this coordinate lies inside a `width`×`height` grid.
    #[must_use]
    pub const fn is_within(self, width: u32, height: u32) -> bool {
        self.row >= 0 && self.col >= 0 && self.row < height as i32 && self.col < width as i32
    }

    /// Returns this coordinate shifted by `(d_row, d_col)`.
    #[must_use]
    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Chebyshev (king-move) distance between two coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        let dr = (self.row - other.row).unsigned_abs();
        let dc = (self.col - other.col).unsigned_abs();
        dr.max(dc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_roundtrip() {
        let coord = GridCoord::from_plot(PlotId::new(6), 4);
        assert_eq!(coord, GridCoord::new(1, 2));
        assert_eq!(coord.to_plot(4, 4), Some(PlotId::new(6)));
    }

    #[test]
    fn test_out_of_bounds() {
        assert_eq!(GridCoord::new(-1, 0).to_plot(4, 4), None);
        assert_eq!(GridCoord::new(0, 4).to_plot(4, 4), None);
        assert_eq!(GridCoord::new(4, 0).to_plot(4, 4), None);
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = GridCoord::new(0, 0);
        assert_eq!(a.chebyshev_distance(GridCoord::new(1, 1)), 1);
        assert_eq!(a.chebyshev_distance(GridCoord::new(3, 1)), 3);
        assert_eq!(a.chebyshev_distance(a), 0);
    }
}
