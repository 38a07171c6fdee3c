/*!
Step-search tolerances.

The step searches in `kinematic` and `ground` advance a box by `STEP_SIZE` per iteration,
so these constants fix both the resolution of contact positions and the worst-case
iteration count (`max_distance / STEP_SIZE`).

Notes
- Distances are world units; one map cell is 16 units.
- Everything here is an exact fixed-point value. Do not derive these from floats.
*/

use crate::{fixed::Fixed, geometry::Vector2};

/// Increment of every step search (1/256 unit).
pub const STEP_SIZE: Fixed = Fixed::from_raw(1 << (crate::fixed::FRACTION_BITS - 8));

/// Default thickness of the directional probe boxes around a collider.
pub const MASK_SIZE: Fixed = STEP_SIZE;

/// Default `max_distance` of a step search when the caller does not give one.
pub const QUERY_MAX_DISTANCE: Fixed = Fixed::ONE;

pub const STEP_LEFT_VECTOR: Vector2 = Vector2::new(Fixed::from_raw(-STEP_SIZE.raw()), Fixed::ZERO);
pub const STEP_UP_VECTOR: Vector2 = Vector2::new(Fixed::ZERO, Fixed::from_raw(-STEP_SIZE.raw()));
pub const STEP_RIGHT_VECTOR: Vector2 = Vector2::new(STEP_SIZE, Fixed::ZERO);
pub const STEP_DOWN_VECTOR: Vector2 = Vector2::new(Fixed::ZERO, STEP_SIZE);
