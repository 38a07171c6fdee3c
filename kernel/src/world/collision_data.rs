use serde::{Deserialize, Serialize};

use crate::{
    collision::CollisionFlags,
    constants::MAP_SIZE,
    error::KernelError,
    fixed::Fixed,
    geometry::{RightTriangle, Vector2},
};

/// Per-map collision classification, with the byte codes of the level format.
///
/// Slope variants are named after the surface heights at the cell's left and right edges,
/// measured from the cell top (so `Slope16_8` rises from the bottom-left corner to the
/// middle of the right edge).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum CollisionData {
    #[default]
    None = 0x00,
    Slope16_8 = 0x01,
    Slope8_0 = 0x02,
    Slope8_16 = 0x03,
    Slope0_8 = 0x04,
    Slope16_12 = 0x05,
    Slope12_8 = 0x06,
    Slope8_4 = 0x07,
    Slope4_0 = 0x08,
    Slope12_16 = 0x09,
    Slope8_12 = 0x0A,
    Slope4_8 = 0x0B,
    Slope0_4 = 0x0C,
    Water = 0x0D,
    WaterSurface = 0x0E,
    Mud = 0x11,
    Ladder = 0x12,
    TopLadder = 0x13,
    TopMud = 0x1C,
    Lava = 0x33,
    Solid2 = 0x34,
    Solid3 = 0x35,
    UnclimbableSolid = 0x36,
    LeftTreadmill = 0x37,
    RightTreadmill = 0x38,
    UpSlopeBase = 0x39,
    DownSlopeBase = 0x3A,
    Solid = 0x3B,
    Breakable = 0x3C,
    Door = 0x3D,
    NonLethalSpike = 0x3E,
    LethalSpike = 0x3F,
    LeftTreadmillSlope16_12 = 0x45,
    LeftTreadmillSlope12_8 = 0x46,
    LeftTreadmillSlope8_4 = 0x47,
    LeftTreadmillSlope4_0 = 0x48,
    RightTreadmillSlope12_16 = 0x49,
    RightTreadmillSlope8_12 = 0x4A,
    RightTreadmillSlope4_8 = 0x4B,
    RightTreadmillSlope0_4 = 0x4C,
    IceSlope16_12 = 0x85,
    IceSlope12_8 = 0x86,
    IceSlope8_4 = 0x87,
    IceSlope4_0 = 0x88,
    IceSlope12_16 = 0x89,
    IceSlope8_12 = 0x8A,
    IceSlope4_8 = 0x8B,
    IceSlope0_4 = 0x8C,
    Ice = 0xBE,
}

impl CollisionData {
    pub const ALL: [CollisionData; 49] = [
        CollisionData::None,
        CollisionData::Slope16_8,
        CollisionData::Slope8_0,
        CollisionData::Slope8_16,
        CollisionData::Slope0_8,
        CollisionData::Slope16_12,
        CollisionData::Slope12_8,
        CollisionData::Slope8_4,
        CollisionData::Slope4_0,
        CollisionData::Slope12_16,
        CollisionData::Slope8_12,
        CollisionData::Slope4_8,
        CollisionData::Slope0_4,
        CollisionData::Water,
        CollisionData::WaterSurface,
        CollisionData::Mud,
        CollisionData::Ladder,
        CollisionData::TopLadder,
        CollisionData::TopMud,
        CollisionData::Lava,
        CollisionData::Solid2,
        CollisionData::Solid3,
        CollisionData::UnclimbableSolid,
        CollisionData::LeftTreadmill,
        CollisionData::RightTreadmill,
        CollisionData::UpSlopeBase,
        CollisionData::DownSlopeBase,
        CollisionData::Solid,
        CollisionData::Breakable,
        CollisionData::Door,
        CollisionData::NonLethalSpike,
        CollisionData::LethalSpike,
        CollisionData::LeftTreadmillSlope16_12,
        CollisionData::LeftTreadmillSlope12_8,
        CollisionData::LeftTreadmillSlope8_4,
        CollisionData::LeftTreadmillSlope4_0,
        CollisionData::RightTreadmillSlope12_16,
        CollisionData::RightTreadmillSlope8_12,
        CollisionData::RightTreadmillSlope4_8,
        CollisionData::RightTreadmillSlope0_4,
        CollisionData::IceSlope16_12,
        CollisionData::IceSlope12_8,
        CollisionData::IceSlope8_4,
        CollisionData::IceSlope4_0,
        CollisionData::IceSlope12_16,
        CollisionData::IceSlope8_12,
        CollisionData::IceSlope4_8,
        CollisionData::IceSlope0_4,
        CollisionData::Ice,
    ];

    #[inline]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.as_byte() == byte)
    }

    /// Like `TryFrom<u8>` but maps unknown bytes to `None` (the variant), logging them.
    pub fn from_byte_lossy(byte: u8) -> Self {
        Self::from_byte(byte).unwrap_or_else(|| {
            log::warn!("unknown collision data byte {byte:#04x}, treating as empty");
            CollisionData::None
        })
    }

    pub fn is_solid_block(self) -> bool {
        matches!(
            self,
            CollisionData::Lava
                | CollisionData::Solid2
                | CollisionData::Solid3
                | CollisionData::UnclimbableSolid
                | CollisionData::LeftTreadmill
                | CollisionData::RightTreadmill
                | CollisionData::UpSlopeBase
                | CollisionData::DownSlopeBase
                | CollisionData::Solid
                | CollisionData::Breakable
                | CollisionData::NonLethalSpike
                | CollisionData::LethalSpike
                | CollisionData::Ice
        )
    }

    #[inline]
    pub fn is_slope(self) -> bool {
        self.slope_heights().is_some()
    }

    /// Surface heights `(left, right)` from the cell top, for slope variants.
    pub fn slope_heights(self) -> Option<(i32, i32)> {
        let heights = match self {
            Self::Slope16_8 => (16, 8),
            Self::Slope8_0 => (8, 0),
            Self::Slope8_16 => (8, 16),
            Self::Slope0_8 => (0, 8),
            Self::Slope16_12 | Self::LeftTreadmillSlope16_12 | Self::IceSlope16_12 => (16, 12),
            Self::Slope12_8 | Self::LeftTreadmillSlope12_8 | Self::IceSlope12_8 => (12, 8),
            Self::Slope8_4 | Self::LeftTreadmillSlope8_4 | Self::IceSlope8_4 => (8, 4),
            Self::Slope4_0 | Self::LeftTreadmillSlope4_0 | Self::IceSlope4_0 => (4, 0),
            Self::Slope12_16 | Self::RightTreadmillSlope12_16 | Self::IceSlope12_16 => (12, 16),
            Self::Slope8_12 | Self::RightTreadmillSlope8_12 | Self::IceSlope8_12 => (8, 12),
            Self::Slope4_8 | Self::RightTreadmillSlope4_8 | Self::IceSlope4_8 => (4, 8),
            Self::Slope0_4 | Self::RightTreadmillSlope0_4 | Self::IceSlope0_4 => (0, 4),
            _ => return None,
        };
        Some(heights)
    }

    /// Slope triangle in cell-local coordinates (cell top-left at the origin).
    pub fn slope_triangle(self) -> Option<RightTriangle> {
        self.slope_heights()
            .map(|(left, right)| make_slope_triangle(left, right))
    }

    /// Flag a query produces for this data when it hits, ignoring the ignore mask.
    pub fn to_collision_flags(self) -> CollisionFlags {
        if self.is_solid_block() {
            CollisionFlags::BLOCK
        } else if self == CollisionData::Ladder {
            CollisionFlags::LADDER
        } else if self == CollisionData::TopLadder {
            CollisionFlags::TOP_LADDER
        } else if self.is_slope() {
            CollisionFlags::SLOPE
        } else {
            CollisionFlags::NONE
        }
    }
}

/// Triangle between the surface line from `(0, left)` to `(MAP_SIZE, right)` and the
/// horizontal through its lower end. The right angle sits under the higher end.
pub fn make_slope_triangle(left: i32, right: i32) -> RightTriangle {
    let size = Fixed::from_int(MAP_SIZE);
    if left < right {
        RightTriangle::new(
            Vector2::new(Fixed::ZERO, Fixed::from_int(right)),
            size,
            Fixed::from_int(left - right),
        )
    } else {
        RightTriangle::new(
            Vector2::new(size, Fixed::from_int(left)),
            -size,
            Fixed::from_int(right - left),
        )
    }
}

impl TryFrom<u8> for CollisionData {
    type Error = KernelError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte).ok_or(KernelError::UnknownCollisionData(byte))
    }
}

impl From<CollisionData> for u8 {
    fn from(data: CollisionData) -> u8 {
        data.as_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_round_trips_through_its_byte() {
        for data in CollisionData::ALL {
            assert_eq!(CollisionData::try_from(data.as_byte()), Ok(data));
        }
        assert_eq!(CollisionData::try_from(0x40), Err(KernelError::UnknownCollisionData(0x40)));
        assert_eq!(CollisionData::from_byte_lossy(0xff), CollisionData::None);
    }

    #[test]
    fn there_are_twenty_eight_slopes() {
        let slopes = CollisionData::ALL.iter().filter(|d| d.is_slope()).count();
        assert_eq!(slopes, 28);
        assert!(!CollisionData::ALL.iter().any(|d| d.is_slope() && d.is_solid_block()));
    }

    #[test]
    fn slope_triangles_span_the_cell_width() {
        for data in CollisionData::ALL.iter().filter(|d| d.is_slope()) {
            let t = data.slope_triangle().unwrap();
            let bx = t.wrapping_box();
            assert_eq!(bx.width(), Fixed::from_int(MAP_SIZE), "{data:?}");
            let (left, right) = data.slope_heights().unwrap();
            assert_eq!(bx.bottom(), Fixed::from_int(left.max(right)), "{data:?}");
            assert_eq!(t.hypotenuse_y_at(Fixed::ZERO), Fixed::from_int(left), "{data:?}");
            assert_eq!(t.hypotenuse_y_at(Fixed::from_int(MAP_SIZE)), Fixed::from_int(right), "{data:?}");
        }
    }

    #[test]
    fn orientation_follows_the_higher_edge() {
        // Surface higher on the right: right angle bottom-right, cathetus pointing left.
        let rising = CollisionData::Slope16_8.slope_triangle().unwrap();
        assert_eq!(rising.origin, Vector2::from_ints(16, 16));
        assert_eq!(rising.h_sign(), -1);

        let falling = CollisionData::Slope8_16.slope_triangle().unwrap();
        assert_eq!(falling.origin, Vector2::from_ints(0, 16));
        assert_eq!(falling.h_sign(), 1);
    }

    #[test]
    fn flags_by_family() {
        assert_eq!(CollisionData::Breakable.to_collision_flags(), CollisionFlags::BLOCK);
        assert_eq!(CollisionData::Ladder.to_collision_flags(), CollisionFlags::LADDER);
        assert_eq!(CollisionData::TopLadder.to_collision_flags(), CollisionFlags::TOP_LADDER);
        assert_eq!(CollisionData::IceSlope4_8.to_collision_flags(), CollisionFlags::SLOPE);
        assert_eq!(CollisionData::Water.to_collision_flags(), CollisionFlags::NONE);
        assert_eq!(CollisionData::Door.to_collision_flags(), CollisionFlags::NONE);
    }

    #[test]
    fn serializes_as_level_byte() {
        assert_eq!(serde_json::to_string(&CollisionData::Solid).unwrap(), "59");
        let back: CollisionData = serde_json::from_str("18").unwrap();
        assert_eq!(back, CollisionData::Ladder);
        assert!(serde_json::from_str::<CollisionData>("64").is_err());
    }
}
