//! Deterministic fixed-point scalar.
//!
//! Every physics-relevant quantity in the kernel is a [`Fixed`]: a signed 32-bit raw integer
//! with [`FRACTION_BITS`] fractional bits (1/512 precision, integer range roughly ±4.19M).
//!
//! # Arithmetic
//! - `+`/`-` operate directly on raw values.
//! - `*` widens to `i64`, multiplies, then shifts right by `FRACTION_BITS`.
//! - `/` widens to `i64`, shifts the dividend left by `FRACTION_BITS`, then divides.
//!
//! Widened results saturate into the `i32` range instead of wrapping.
//!
//! # Floats
//! `from_f32`/`to_f32` exist for level data and rendering. Nothing on the collision path
//! should call them.

use std::{
    fmt,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use num_traits::{Bounded, One, Zero};
use serde::{Deserialize, Serialize};

/// Number of fractional bits in the raw representation.
pub const FRACTION_BITS: u32 = 9;

const ONE_RAW: i32 = 1 << FRACTION_BITS;
const FRACTION_MASK: i32 = ONE_RAW - 1;

/// Signed fixed-point number with 9 fractional bits.
///
/// Serializes as its raw `i32`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(i32);

#[inline]
fn saturate(wide: i64) -> i32 {
    wide.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(ONE_RAW);
    pub const HALF: Fixed = Fixed(ONE_RAW / 2);
    /// Smallest positive representable value (one raw unit).
    pub const EPSILON: Fixed = Fixed(1);
    pub const MIN: Fixed = Fixed(i32::MIN);
    pub const MAX: Fixed = Fixed(i32::MAX);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Builds a value from an integer. Out-of-range integers wrap, like the raw shift would.
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self(n.wrapping_shl(FRACTION_BITS))
    }

    /// Builds `num / den` exactly as the fixed division would.
    #[inline]
    pub const fn from_ratio(num: i32, den: i32) -> Self {
        let wide = ((num as i64) << (2 * FRACTION_BITS)) / ((den as i64) << FRACTION_BITS);
        Self(wide as i32)
    }

    /// Content-boundary conversion. Truncates toward zero.
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Self((value * ONE_RAW as f32) as i32)
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / ONE_RAW as f32
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / ONE_RAW as f64
    }

    /// Integer part, rounded toward negative infinity.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACTION_BITS
    }

    #[inline]
    pub const fn floor(self) -> Self {
        Self(self.0 & !FRACTION_MASK)
    }

    #[inline]
    pub const fn ceil(self) -> Self {
        Self(self.0.saturating_add(FRACTION_MASK) & !FRACTION_MASK)
    }

    /// Rounds half up (toward positive infinity).
    #[inline]
    pub const fn round(self) -> Self {
        Self(self.0.saturating_add(ONE_RAW / 2) & !FRACTION_MASK)
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// -1, 0 or 1.
    #[inline]
    pub const fn signum(self) -> i32 {
        self.0.signum()
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }

    #[inline]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        Ord::clamp(self, lo, hi)
    }

    /// Multiplies then divides with a single 64-bit intermediate: `self * num / den`.
    ///
    /// Slope ratios use this so the rise is not rounded before the run is divided out.
    #[inline]
    pub fn mul_div(self, num: Fixed, den: Fixed) -> Fixed {
        assert!(den.0 != 0, "fixed-point division by zero");
        let wide = self.0 as i64 * num.0 as i64 / den.0 as i64;
        Fixed(saturate(wide))
    }

    #[inline]
    pub const fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub const fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(i32::from_le_bytes(bytes))
    }

    /// Reads a value from the front of `bytes`, returning it and the remaining input.
    pub fn read_le(bytes: &[u8]) -> Option<(Self, &[u8])> {
        let (head, rest) = bytes.split_first_chunk::<4>()?;
        Some((Self::from_le_bytes(*head), rest))
    }

    pub fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self.to_f64())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl From<i32> for Fixed {
    #[inline]
    fn from(n: i32) -> Self {
        Self::from_int(n)
    }
}

impl Add for Fixed {
    type Output = Fixed;

    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(saturate((self.0 as i64 * rhs.0 as i64) >> FRACTION_BITS))
    }
}

impl Div for Fixed {
    type Output = Fixed;

    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        assert!(rhs.0 != 0, "fixed-point division by zero");
        Fixed(saturate(((self.0 as i64) << FRACTION_BITS) / rhs.0 as i64))
    }
}

impl Mul<i32> for Fixed {
    type Output = Fixed;

    #[inline]
    fn mul(self, rhs: i32) -> Fixed {
        Fixed(saturate(self.0 as i64 * rhs as i64))
    }
}

impl Div<i32> for Fixed {
    type Output = Fixed;

    #[inline]
    fn div(self, rhs: i32) -> Fixed {
        assert!(rhs != 0, "fixed-point division by zero");
        Fixed(self.0 / rhs)
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fixed {
    #[inline]
    fn mul_assign(&mut self, rhs: Fixed) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fixed {
    #[inline]
    fn div_assign(&mut self, rhs: Fixed) {
        *self = *self / rhs;
    }
}

impl Zero for Fixed {
    #[inline]
    fn zero() -> Self {
        Fixed::ZERO
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl One for Fixed {
    #[inline]
    fn one() -> Self {
        Fixed::ONE
    }
}

impl Bounded for Fixed {
    #[inline]
    fn min_value() -> Self {
        Fixed::MIN
    }

    #[inline]
    fn max_value() -> Self {
        Fixed::MAX
    }
}
