//! Grid cell addressing at the four nested granularities.
//!
//! World space is measured in units with `y` growing downward. The same position can be
//! addressed as a tile, map, block or scene cell; each is `floor(pos / size)` per axis.
//!
//! # Model
//! - `Cell` is a signed `(row, col)` pair. Cells computed from positions outside the world
//!   are negative or past the end; grid consumers clamp with [`Cell::clamp_to`].
//! - Row is the `y` axis, col is the `x` axis. Scans are row-major.
//!
//! # Granularities
//! - tile  = `TILE_SIZE`  (8)
//! - map   = `MAP_SIZE`   (16), the unit collision data is stored at
//! - block = `BLOCK_SIZE` (32)
//! - scene = `SCENE_SIZE` (256)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{BLOCK_SIZE, MAP_SIZE, SCENE_SIZE, TILE_SIZE},
    fixed::Fixed,
    geometry::{AxisBox, Vector2},
};

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Cell containing `pos` in a grid of `size`-unit cells.
    #[inline]
    pub fn from_pos(pos: Vector2, size: i32) -> Self {
        Self::new(
            pos.y.to_int().div_euclid(size),
            pos.x.to_int().div_euclid(size),
        )
    }

    /// World box covered by this cell in a grid of `size`-unit cells.
    #[inline]
    pub fn bounding_box(self, size: i32) -> AxisBox {
        AxisBox::from_ltwh(
            Fixed::from_int(self.col * size),
            Fixed::from_int(self.row * size),
            Fixed::from_int(size),
            Fixed::from_int(size),
        )
    }

    /// Clamps into `[0, rows) x [0, cols)`. Callers must pass a non-empty grid.
    #[inline]
    pub fn clamp_to(self, rows: usize, cols: usize) -> Self {
        let max_row = (rows as i32 - 1).max(0);
        let max_col = (cols as i32 - 1).max(0);
        Self::new(self.row.clamp(0, max_row), self.col.clamp(0, max_col))
    }

    /// `(row, col)` as indices when the cell lies inside a `rows x cols` grid.
    #[inline]
    pub fn index_in(self, rows: usize, cols: usize) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        (row < rows && col < cols).then_some((row, col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

#[inline]
pub fn tile_cell_from_pos(pos: Vector2) -> Cell {
    Cell::from_pos(pos, TILE_SIZE)
}

#[inline]
pub fn map_cell_from_pos(pos: Vector2) -> Cell {
    Cell::from_pos(pos, MAP_SIZE)
}

#[inline]
pub fn block_cell_from_pos(pos: Vector2) -> Cell {
    Cell::from_pos(pos, BLOCK_SIZE)
}

#[inline]
pub fn scene_cell_from_pos(pos: Vector2) -> Cell {
    Cell::from_pos(pos, SCENE_SIZE)
}

#[inline]
pub fn tile_bounding_box(cell: Cell) -> AxisBox {
    cell.bounding_box(TILE_SIZE)
}

#[inline]
pub fn map_bounding_box(cell: Cell) -> AxisBox {
    cell.bounding_box(MAP_SIZE)
}

#[inline]
pub fn block_bounding_box(cell: Cell) -> AxisBox {
    cell.bounding_box(BLOCK_SIZE)
}

#[inline]
pub fn scene_bounding_box(cell: Cell) -> AxisBox {
    cell.bounding_box(SCENE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_map_to_each_granularity() {
        let p = Vector2::from_ints(40, 300);
        assert_eq!(tile_cell_from_pos(p), Cell::new(37, 5));
        assert_eq!(map_cell_from_pos(p), Cell::new(18, 2));
        assert_eq!(block_cell_from_pos(p), Cell::new(9, 1));
        assert_eq!(scene_cell_from_pos(p), Cell::new(1, 0));
    }

    #[test]
    fn cell_edges_belong_to_the_next_cell() {
        assert_eq!(map_cell_from_pos(Vector2::from_ints(16, 16)), Cell::new(1, 1));
        let just_before = Vector2::new(Fixed::from_int(16) - Fixed::EPSILON, Fixed::ZERO);
        assert_eq!(map_cell_from_pos(just_before), Cell::new(0, 0));
    }

    #[test]
    fn negative_positions_floor_away_from_zero() {
        let p = Vector2::new(-Fixed::HALF, Fixed::from_int(-17));
        assert_eq!(map_cell_from_pos(p), Cell::new(-2, -1));
    }

    #[test]
    fn bounding_box_inverts_cell_lookup() {
        let cell = Cell::new(3, 7);
        let bx = map_bounding_box(cell);
        assert_eq!(bx, AxisBox::from_ints(112, 48, 16, 16));
        assert_eq!(map_cell_from_pos(bx.left_top()), cell);
        assert_eq!(map_cell_from_pos(bx.center()), cell);
    }

    #[test]
    fn clamp_and_index() {
        assert_eq!(Cell::new(-4, 99).clamp_to(10, 20), Cell::new(0, 19));
        assert_eq!(Cell::new(2, 3).index_in(10, 20), Some((2, 3)));
        assert_eq!(Cell::new(-1, 3).index_in(10, 20), None);
        assert_eq!(Cell::new(10, 3).index_in(10, 20), None);
    }
}
