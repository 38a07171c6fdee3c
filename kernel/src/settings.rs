/*!
Per-body physics tunables.

Defaults come from `constants.rs` and `collision/settings.rs`. Content can ship overrides
as JSON; every `Fixed` field is written as its raw 9-fractional-bit integer so settings
files load bit-exactly (`"gravity": 128` is 0.25).
*/

use serde::{Deserialize, Serialize};

use crate::{
    collision::settings::{MASK_SIZE, QUERY_MAX_DISTANCE},
    constants::{GRAVITY, TERMINAL_DOWNWARD_SPEED, TILE_SIZE},
    error::KernelError,
    fixed::Fixed,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Added to `velocity.y` after every tick. Zero disables falling.
    pub gravity: Fixed,
    /// Cap on `velocity.y`.
    pub terminal_downward_speed: Fixed,
    /// Thickness of the collider's directional probes.
    pub mask_size: Fixed,
    /// How far a body walking down a slope may drop to stay glued to it.
    pub slope_snap_distance: Fixed,
    /// Step-search budget for re-seating a body on the floor.
    pub floor_adjust_distance: Fixed,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            terminal_downward_speed: TERMINAL_DOWNWARD_SPEED,
            mask_size: MASK_SIZE,
            slope_snap_distance: Fixed::from_int(TILE_SIZE / 2) * QUERY_MAX_DISTANCE,
            floor_adjust_distance: QUERY_MAX_DISTANCE,
        }
    }
}

impl PhysicsSettings {
    /// Settings for bodies that never fall (platforms, projectiles).
    pub fn weightless() -> Self {
        Self {
            gravity: Fixed::ZERO,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, KernelError> {
        let settings: PhysicsSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, KernelError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), KernelError> {
        if self.gravity.is_negative() {
            return Err(KernelError::InvalidSettings(format!(
                "gravity must not be negative, got {}",
                self.gravity
            )));
        }
        if self.terminal_downward_speed.is_negative() {
            return Err(KernelError::InvalidSettings(format!(
                "terminal downward speed must not be negative, got {}",
                self.terminal_downward_speed
            )));
        }
        if !self.mask_size.is_positive() {
            return Err(KernelError::InvalidSettings(format!(
                "mask size must be positive, got {}",
                self.mask_size
            )));
        }
        Ok(())
    }
}
