/*!
Collision root module.

Tile-grid collision for axis-aligned bodies. Every query reads a [`CollisionSource`]
passed in by the caller; nothing here holds global state. The code is split as:

- types:        flags, directions, sides, placements and `Classification`
- settings:     step-search tolerances and step vectors
- narrow_phase: `classify`, the grid scan every other routine is built on
- ground:       landed-state resolution and downward floor searches
- kinematic:    directional step searches (`move_until_intersect`)
- collider:     `BoxCollider`, the per-entity probe cache
- broad:        `Partition`, the entity-vs-entity broad phase

[`CollisionSource`]: crate::world::CollisionSource
*/

pub mod broad;
pub mod collider;
pub mod ground;
pub mod kinematic;
pub mod narrow_phase;
pub mod settings;
pub mod types;

// Re-export commonly used types and functions.
pub use broad::Partition;
pub use collider::BoxCollider;
pub use ground::{
    adjust_on_the_floor, landed_state, move_contact_floor, try_move_contact_floor,
    try_move_contact_slope,
};
pub use kinematic::{StepQuery, move_until_intersect, step_vector};
pub use narrow_phase::{classify, collision_flags, touching_flags};
pub use types::{
    Classification, CollisionFlag, CollisionFlags, CollisionPlacement, CollisionSide,
    CollisionSides, Direction, Directions,
};
