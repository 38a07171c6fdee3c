pub mod bitmask_flags;
pub mod cell;
pub mod collision;
pub mod constants;
pub mod error;
pub mod fixed;
pub mod geometry;
pub mod movement;
pub mod settings;
pub mod world;

pub use cell::Cell;
pub use collision::{
    BoxCollider, Classification, CollisionFlag, CollisionFlags, CollisionPlacement, CollisionSide,
    CollisionSides, Direction, Directions, Partition,
};
pub use constants::{BLOCK_SIZE, GRAVITY, MAP_SIZE, SCENE_SIZE, TERMINAL_DOWNWARD_SPEED, TILE_SIZE};
pub use error::KernelError;
pub use fixed::Fixed;
pub use geometry::{AxisBox, LineSegment, RightTriangle, Vector2};
pub use movement::{
    Actor, Body, Contacts, StepOutcome, move_along_slope, move_x, step_body, step_bodies,
};
pub use settings::PhysicsSettings;
pub use world::{CollisionData, CollisionGrid, CollisionSource, Layout};
