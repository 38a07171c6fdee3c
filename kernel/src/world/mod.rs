/*!
Static level collision.

The kernel never owns a level. It reads collision data through [`CollisionSource`], a
read-only view of a grid of map cells (`MAP_SIZE` units square). Two implementations ship:

- grid:   `CollisionGrid`, a flat row-major array of `CollisionData`. Cheapest to query.
- layout: `Layout`, the game's nested scene -> block -> map palettes.

A source is read-only for the whole of a tick; edits happen between ticks.
*/

pub mod collision_data;
pub mod grid;
pub mod layout;

pub use collision_data::{CollisionData, make_slope_triangle};
pub use grid::CollisionGrid;
pub use layout::{BlockDef, Layout, LayoutBuilder, MapDef, SceneDef};

use crate::{
    cell::{self, Cell},
    constants::MAP_SIZE,
    fixed::Fixed,
    geometry::{AxisBox, Vector2},
};

/// Read-only view of the map-cell collision grid.
pub trait CollisionSource {
    fn map_row_count(&self) -> usize;

    fn map_col_count(&self) -> usize;

    /// Collision data of the map cell. Cells outside the grid or without a map read as
    /// `CollisionData::None`.
    fn collision_data_at(&self, cell: Cell) -> CollisionData;

    fn map_bounding_box(&self, cell: Cell) -> AxisBox {
        cell::map_bounding_box(cell)
    }

    fn width(&self) -> Fixed {
        Fixed::from_int(self.map_col_count() as i32 * MAP_SIZE)
    }

    fn height(&self) -> Fixed {
        Fixed::from_int(self.map_row_count() as i32 * MAP_SIZE)
    }

    /// World box covered by the grid, anchored at the origin.
    fn bounding_box(&self) -> AxisBox {
        AxisBox::from_origin_size(Vector2::ZERO, self.width(), self.height())
    }

    fn is_empty(&self) -> bool {
        self.map_row_count() == 0 || self.map_col_count() == 0
    }
}

impl<S: CollisionSource + ?Sized> CollisionSource for &S {
    fn map_row_count(&self) -> usize {
        (**self).map_row_count()
    }

    fn map_col_count(&self) -> usize {
        (**self).map_col_count()
    }

    fn collision_data_at(&self, cell: Cell) -> CollisionData {
        (**self).collision_data_at(cell)
    }

    fn map_bounding_box(&self, cell: Cell) -> AxisBox {
        (**self).map_bounding_box(cell)
    }
}
