/*!
Core collision types shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between:
- narrow_phase (grid classification of a query box)
- ground (landed-state resolution and floor searches)
- kinematic (directional step searches)
- collider (the per-entity `BoxCollider` cache)
- movement (per-tick body integration)

Flags are typed bitmasks: `CollisionFlags` results are routinely fed back into later
queries as the `ignore` mask, and `Directions` select which probe colliders a step search
consults.
*/

use crate::{
    bitmask_flags::BitmaskFlags,
    cell::Cell,
    define_bitmask_flags,
    geometry::{AxisBox, RightTriangle, Vector2},
    world::CollisionData,
};

define_bitmask_flags!(CollisionFlag, u8, {
    Block,
    Slope,
    Ladder,
    TopLadder,
});

/// What a query box overlaps. Empty means "nothing".
pub type CollisionFlags = BitmaskFlags<CollisionFlag>;

impl CollisionFlags {
    pub const NONE: Self = Self::from_bits(0);
    pub const BLOCK: Self = Self::from_bits(1 << CollisionFlag::Block as u8);
    pub const SLOPE: Self = Self::from_bits(1 << CollisionFlag::Slope as u8);
    pub const LADDER: Self = Self::from_bits(1 << CollisionFlag::Ladder as u8);
    pub const TOP_LADDER: Self = Self::from_bits(1 << CollisionFlag::TopLadder as u8);
}

define_bitmask_flags!(Direction, u8, {
    Left,
    Up,
    Right,
    Down,
});

/// Set of sides, used as the mask argument of the step searches.
pub type Directions = BitmaskFlags<Direction>;

impl Directions {
    pub const NONE: Self = Self::from_bits(0);
    pub const LEFT: Self = Self::from_bits(1 << Direction::Left as u8);
    pub const UP: Self = Self::from_bits(1 << Direction::Up as u8);
    pub const RIGHT: Self = Self::from_bits(1 << Direction::Right as u8);
    pub const DOWN: Self = Self::from_bits(1 << Direction::Down as u8);
    pub const ALL: Self = Self::from_bits(0b1111);
}

impl Direction {
    /// Unit vector pointing toward this side (`y` grows downward).
    pub fn unit_vector(self) -> Vector2 {
        match self {
            Direction::Left => Vector2::LEFT,
            Direction::Up => Vector2::UP,
            Direction::Right => Vector2::RIGHT,
            Direction::Down => Vector2::DOWN,
        }
    }
}

define_bitmask_flags!(CollisionSide, u8, {
    Inner,
    Floor,
    Ceil,
    LeftWall,
    RightWall,
});

/// Which part of a cell counts as a hit.
///
/// `INNER` is plain area overlap and is what every kernel routine uses. The edge sides
/// only count the cell edge facing the query (a `FLOOR` query looks at top edges).
pub type CollisionSides = BitmaskFlags<CollisionSide>;

impl CollisionSides {
    pub const NONE: Self = Self::from_bits(0);
    pub const INNER: Self = Self::from_bits(1 << CollisionSide::Inner as u8);
    pub const FLOOR: Self = Self::from_bits(1 << CollisionSide::Floor as u8);
    pub const CEIL: Self = Self::from_bits(1 << CollisionSide::Ceil as u8);
    pub const LEFT_WALL: Self = Self::from_bits(1 << CollisionSide::LeftWall as u8);
    pub const RIGHT_WALL: Self = Self::from_bits(1 << CollisionSide::RightWall as u8);

    /// Edge relevant to a probe moving along `dir`. Diagonals combine both edges.
    pub fn facing(dir: Vector2) -> Self {
        let mut sides = Self::NONE;
        if dir.x.is_positive() {
            sides |= Self::RIGHT_WALL;
        } else if dir.x.is_negative() {
            sides |= Self::LEFT_WALL;
        }
        if dir.y.is_positive() {
            sides |= Self::FLOOR;
        } else if dir.y.is_negative() {
            sides |= Self::CEIL;
        }
        if sides.is_empty() { Self::INNER } else { sides }
    }
}

/// One grid cell that contributed to a classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionPlacement {
    pub cell: Cell,
    pub data: CollisionData,
    /// The flag this cell produced (`SLOPE` for slope cells).
    pub flag: CollisionFlag,
    /// World box of the map cell.
    pub bounding_box: AxisBox,
}

impl CollisionPlacement {
    #[inline]
    pub fn row(&self) -> i32 {
        self.cell.row
    }

    #[inline]
    pub fn col(&self) -> i32 {
        self.cell.col
    }

    /// Slope triangle of the cell in world space, or `EMPTY` for non-slope cells.
    pub fn slope_triangle(&self) -> RightTriangle {
        self.data
            .slope_triangle()
            .map(|t| t.translated(self.bounding_box.left_top()))
            .unwrap_or(RightTriangle::EMPTY)
    }
}

/// Result of a grid classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub flags: CollisionFlags,
    /// Last slope hit in scan order, `EMPTY` when no slope was hit.
    pub slope: RightTriangle,
}

impl Classification {
    pub const NONE: Classification = Classification {
        flags: CollisionFlags::NONE,
        slope: RightTriangle::EMPTY,
    };

    #[inline]
    pub fn is_none(&self) -> bool {
        self.flags.is_empty()
    }

    #[inline]
    pub fn has(&self, flag: CollisionFlag) -> bool {
        self.flags.has(flag)
    }
}
