use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::fixed::Fixed;

/// 2D vector (or point) in world units. `y` grows downward.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: Fixed,
    pub y: Fixed,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2::new(Fixed::ZERO, Fixed::ZERO);
    pub const LEFT: Vector2 = Vector2::new(Fixed::from_int(-1), Fixed::ZERO);
    pub const UP: Vector2 = Vector2::new(Fixed::ZERO, Fixed::from_int(-1));
    pub const RIGHT: Vector2 = Vector2::new(Fixed::from_int(1), Fixed::ZERO);
    pub const DOWN: Vector2 = Vector2::new(Fixed::ZERO, Fixed::from_int(1));

    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_int(x), Fixed::from_int(y))
    }

    #[inline]
    pub const fn x_vector(self) -> Self {
        Self::new(self.x, Fixed::ZERO)
    }

    #[inline]
    pub const fn y_vector(self) -> Self {
        Self::new(Fixed::ZERO, self.y)
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    #[inline]
    pub fn scale(self, s: Fixed) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    #[inline]
    pub fn dot(self, other: Vector2) -> Fixed {
        self.x * other.x + self.y * other.y
    }

    /// Squared length in raw units (`raw^2`), exact in 64 bits.
    ///
    /// Only meaningful for comparing lengths against each other.
    #[inline]
    pub fn length_squared_raw(self) -> i64 {
        let x = self.x.raw() as i64;
        let y = self.y.raw() as i64;
        x * x + y * y
    }

    /// Rotates 90° in screen space: right becomes down.
    #[inline]
    pub fn rotate_90(self) -> Self {
        Self::new(-self.y, self.x)
    }

    #[inline]
    pub fn rotate_180(self) -> Self {
        -self
    }

    #[inline]
    pub fn rotate_270(self) -> Self {
        Self::new(self.y, -self.x)
    }

    #[inline]
    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    #[inline]
    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    #[inline]
    pub fn ceil(self) -> Self {
        Self::new(self.x.ceil(), self.y.ceil())
    }

    /// Converts to a float vector for rendering.
    #[inline]
    pub fn to_na(self) -> na::Vector2<f32> {
        na::Vector2::new(self.x.to_f32(), self.y.to_f32())
    }

    pub fn write_le(self, out: &mut Vec<u8>) {
        self.x.write_le(out);
        self.y.write_le(out);
    }

    pub fn read_le(bytes: &[u8]) -> Option<(Self, &[u8])> {
        let (x, rest) = Fixed::read_le(bytes)?;
        let (y, rest) = Fixed::read_le(rest)?;
        Some((Self::new(x, y), rest))
    }
}

impl From<na::Vector2<f32>> for Vector2 {
    fn from(v: na::Vector2<f32>) -> Self {
        Self::new(Fixed::from_f32(v.x), Fixed::from_f32(v.y))
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    #[inline]
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    #[inline]
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    #[inline]
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl Mul<Fixed> for Vector2 {
    type Output = Vector2;

    #[inline]
    fn mul(self, rhs: Fixed) -> Vector2 {
        self.scale(rhs)
    }
}

impl Mul<Vector2> for Fixed {
    type Output = Vector2;

    #[inline]
    fn mul(self, rhs: Vector2) -> Vector2 {
        rhs.scale(self)
    }
}

impl Div<Fixed> for Vector2 {
    type Output = Vector2;

    #[inline]
    fn div(self, rhs: Fixed) -> Vector2 {
        Vector2::new(self.x / rhs, self.y / rhs)
    }
}

impl AddAssign for Vector2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vector2) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector2) {
        *self = *self - rhs;
    }
}
