use std::time::Duration;

use crate::fixed::Fixed;

/// Logical simulation rate. Every kernel routine assumes one call per tick.
pub const TICK_RATE_HZ: u32 = 60;

/// Wall-clock length of one tick.
pub const TICK_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE_HZ as u64);

/// Side of a graphics tile in world units.
pub const TILE_SIZE: i32 = 8;

/// Side of a map (2x2 tiles). Collision data is stored per map, so this is the collision
/// cell size.
pub const MAP_SIZE: i32 = 16;

/// Side of a block (2x2 maps).
pub const BLOCK_SIZE: i32 = 32;

/// Maps per block along each axis.
pub const SIDE_MAPS_PER_BLOCK: usize = (BLOCK_SIZE / MAP_SIZE) as usize;

/// Blocks per scene along each axis.
pub const SIDE_BLOCKS_PER_SCENE: usize = 8;

/// Side of a scene (8x8 blocks).
pub const SCENE_SIZE: i32 = BLOCK_SIZE * SIDE_BLOCKS_PER_SCENE as i32;

/// Default downward acceleration, in units per tick squared.
pub const GRAVITY: Fixed = Fixed::from_ratio(1, 4);

/// Default maximum falling speed, in units per tick.
pub const TERMINAL_DOWNWARD_SPEED: Fixed = Fixed::from_ratio(23, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularities_nest() {
        assert_eq!(MAP_SIZE, 2 * TILE_SIZE);
        assert_eq!(BLOCK_SIZE, 2 * MAP_SIZE);
        assert_eq!(SCENE_SIZE, 256);
        assert_eq!(SIDE_MAPS_PER_BLOCK, 2);
    }

    #[test]
    fn physics_defaults_are_exact_in_fixed_point() {
        assert_eq!(GRAVITY.raw(), 128);
        assert_eq!(TERMINAL_DOWNWARD_SPEED.raw(), 2944);
    }
}
