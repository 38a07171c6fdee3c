/*!
Grid classification.

`classify` scans the map cells overlapped by a query box, row-major, and ORs together
the flag of every cell whose collision data the box actually touches. It is the only
routine that reads the collision grid; everything in `ground`, `kinematic` and `collider`
is built from repeated calls to it.

Notes
- Cells outside the grid are never read: the scan range is clamped to the grid.
- Slope cells are tested against their triangle (hypotenuse excluded) in precise mode and
  against their whole cell box otherwise. When several slope cells hit, the one scanned
  last is reported.
- Nothing here allocates. Placements are appended to a caller-owned vector.
*/

use crate::{
    cell::{self, Cell},
    collision::types::{
        Classification, CollisionFlag, CollisionFlags, CollisionPlacement, CollisionSide,
        CollisionSides,
    },
    geometry::{AxisBox, RightTriangle, Vector2},
    world::{CollisionData, CollisionSource},
};

/// Classifies `bx` against the grid.
///
/// - `ignore`: flags whose cells are skipped entirely.
/// - `precise`: test slope triangles instead of slope cell boxes.
/// - `side`: which part of a cell counts as a hit; kernel routines pass `INNER`.
/// - `placements`: when given, one record per contributing cell is appended.
pub fn classify<S: CollisionSource + ?Sized>(
    source: &S,
    bx: &AxisBox,
    ignore: CollisionFlags,
    precise: bool,
    side: CollisionSides,
    mut placements: Option<&mut Vec<CollisionPlacement>>,
) -> Classification {
    let mut result = Classification::NONE;
    if source.is_empty() {
        return result;
    }

    let rows = source.map_row_count();
    let cols = source.map_col_count();
    let start = cell::map_cell_from_pos(bx.left_top()).clamp_to(rows, cols);
    let end = cell::map_cell_from_pos(bx.right_bottom()).clamp_to(rows, cols);

    for row in start.row..=end.row {
        for col in start.col..=end.col {
            let cell = Cell::new(row, col);
            let data = source.collision_data_at(cell);
            if data == CollisionData::None {
                continue;
            }

            let map_box = source.map_bounding_box(cell);
            if map_box.intersection(bx).area().is_zero() {
                continue;
            }

            let hit = if !ignore.has(CollisionFlag::Block)
                && data.is_solid_block()
                && box_hits(bx, &map_box, side)
            {
                Some(CollisionFlag::Block)
            } else if !ignore.has(CollisionFlag::Ladder)
                && data == CollisionData::Ladder
                && box_hits(bx, &map_box, side)
            {
                Some(CollisionFlag::Ladder)
            } else if !ignore.has(CollisionFlag::TopLadder)
                && data == CollisionData::TopLadder
                && box_hits(bx, &map_box, side)
            {
                Some(CollisionFlag::TopLadder)
            } else if !ignore.has(CollisionFlag::Slope) {
                data.slope_triangle()
                    .map(|t| t.translated(map_box.left_top()))
                    .filter(|st| {
                        if precise {
                            slope_hits(bx, st, side)
                        } else {
                            box_hits(bx, &map_box, side)
                        }
                    })
                    .map(|st| {
                        result.slope = st;
                        CollisionFlag::Slope
                    })
            } else {
                None
            };

            if let Some(flag) = hit {
                result.flags |= flag;
                if let Some(out) = placements.as_deref_mut() {
                    out.push(CollisionPlacement {
                        cell,
                        data,
                        flag,
                        bounding_box: map_box,
                    });
                }
            }
        }
    }

    result
}

/// Flags only, precise, `INNER`.
#[inline]
pub fn collision_flags<S: CollisionSource + ?Sized>(
    source: &S,
    bx: &AxisBox,
    ignore: CollisionFlags,
) -> CollisionFlags {
    classify(source, bx, ignore, true, CollisionSides::INNER, None).flags
}

/// Classification of `bx` displaced by `dir`: what the box would touch after the move.
pub fn touching_flags<S: CollisionSource + ?Sized>(
    source: &S,
    bx: &AxisBox,
    dir: Vector2,
    ignore: CollisionFlags,
    precise: bool,
    placements: Option<&mut Vec<CollisionPlacement>>,
) -> Classification {
    classify(
        source,
        &(*bx + dir),
        ignore,
        precise,
        CollisionSides::INNER,
        placements,
    )
}

fn box_hits(query: &AxisBox, cell_box: &AxisBox, side: CollisionSides) -> bool {
    (side.has(CollisionSide::Inner) && query.has_intersection_with(cell_box))
        || (side.has(CollisionSide::Floor) && cell_box.top_segment().overlaps_box(query))
        || (side.has(CollisionSide::Ceil) && cell_box.bottom_segment().overlaps_box(query))
        || (side.has(CollisionSide::LeftWall) && cell_box.right_segment().overlaps_box(query))
        || (side.has(CollisionSide::RightWall) && cell_box.left_segment().overlaps_box(query))
}

fn slope_hits(query: &AxisBox, slope: &RightTriangle, side: CollisionSides) -> bool {
    let left_wall = if slope.h_sign() > 0 {
        slope.v_cathetus_segment()
    } else {
        slope.hypotenuse()
    };
    let right_wall = if slope.h_sign() < 0 {
        slope.v_cathetus_segment()
    } else {
        slope.hypotenuse()
    };

    (side.has(CollisionSide::Inner) && slope.has_intersection_with(query, true))
        || (side.has(CollisionSide::Floor) && slope.hypotenuse().overlaps_box(query))
        || (side.has(CollisionSide::Ceil) && slope.h_cathetus_segment().overlaps_box(query))
        || (side.has(CollisionSide::LeftWall) && left_wall.overlaps_box(query))
        || (side.has(CollisionSide::RightWall) && right_wall.overlaps_box(query))
}
