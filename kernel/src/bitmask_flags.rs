use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::{BitAnd, BitOr, BitOrAssign, Not, Sub},
};

use num_traits::{One, PrimInt, Zero};

/// Trait implemented by flag enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index, and `Storage` picks
/// the backing integer.
pub trait FlagBitmask: Copy {
    type Storage: PrimInt + Hash + fmt::Debug;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must stay below the bit width of `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A set of `F` flags packed into `F::Storage`.
///
/// The flag type is part of the container type, so a set of collision flags can never be
/// mixed up with a set of directions even though both are a `u8` underneath.
pub struct BitmaskFlags<F: FlagBitmask> {
    pub bits: F::Storage,
    _flag: PhantomData<F>,
}

impl<F: FlagBitmask> BitmaskFlags<F> {
    #[inline]
    pub const fn from_bits(bits: F::Storage) -> Self {
        Self {
            bits,
            _flag: PhantomData,
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self::from_bits(F::Storage::zero())
    }

    #[inline]
    pub fn only(tag: F) -> Self {
        Self::from_bits(tag.mask())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == F::Storage::zero()
    }

    // --- Single Tag Operations ---
    pub fn add(&mut self, tag: F) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove(&mut self, tag: F) {
        self.bits = self.bits & !tag.mask();
    }

    pub fn has(&self, tag: F) -> bool {
        (self.bits & tag.mask()) != F::Storage::zero()
    }

    // --- Bulk Operations ---
    pub fn add_many(&mut self, tags: &[F]) {
        for &tag in tags {
            self.add(tag);
        }
    }

    pub fn remove_many(&mut self, tags: &[F]) {
        for &tag in tags {
            self.remove(tag);
        }
    }

    // --- Logic Gates ---
    pub fn has_all(&self, tags: &[F]) -> bool {
        let combined = Self::combine(tags);
        (self.bits & combined) == combined
    }

    pub fn has_any(&self, tags: &[F]) -> bool {
        (self.bits & Self::combine(tags)) != F::Storage::zero()
    }

    /// At least one flag in common with `other`.
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != F::Storage::zero()
    }

    /// Every flag of `other` is set in `self`.
    #[inline]
    pub fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    pub fn clear(&mut self) {
        self.bits = F::Storage::zero();
    }

    fn combine(tags: &[F]) -> F::Storage {
        tags.iter().fold(F::Storage::zero(), |acc, t| acc | t.mask())
    }
}

impl<F: FlagBitmask> Clone for BitmaskFlags<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: FlagBitmask> Copy for BitmaskFlags<F> {}

impl<F: FlagBitmask> Default for BitmaskFlags<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: FlagBitmask> PartialEq for BitmaskFlags<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F: FlagBitmask> Eq for BitmaskFlags<F> {}

impl<F: FlagBitmask> Hash for BitmaskFlags<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<F: FlagBitmask> fmt::Debug for BitmaskFlags<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitmaskFlags({:?})", self.bits)
    }
}

impl<F: FlagBitmask> From<F> for BitmaskFlags<F> {
    fn from(tag: F) -> Self {
        Self::only(tag)
    }
}

impl<F: FlagBitmask> BitOr for BitmaskFlags<F> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits(self.bits | rhs.bits)
    }
}

impl<F: FlagBitmask> BitOr<F> for BitmaskFlags<F> {
    type Output = Self;

    fn bitor(self, rhs: F) -> Self {
        Self::from_bits(self.bits | rhs.mask())
    }
}

impl<F: FlagBitmask> BitOrAssign for BitmaskFlags<F> {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits = self.bits | rhs.bits;
    }
}

impl<F: FlagBitmask> BitOrAssign<F> for BitmaskFlags<F> {
    fn bitor_assign(&mut self, rhs: F) {
        self.add(rhs);
    }
}

impl<F: FlagBitmask> BitAnd for BitmaskFlags<F> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self::from_bits(self.bits & rhs.bits)
    }
}

impl<F: FlagBitmask> Sub for BitmaskFlags<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_bits(self.bits & !rhs.bits)
    }
}

impl<F: FlagBitmask> Not for BitmaskFlags<F> {
    type Output = Self;

    fn not(self) -> Self {
        Self::from_bits(!self.bits)
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// `A | B` on two variants yields a `BitmaskFlags` of the enum.
///
/// Example:
/// ```rust
/// kernel::define_bitmask_flags!(Status, u16, {
///     Stunned,
///     Burning,
///     Invulnerable,
/// });
///
/// let set = Status::Stunned | Status::Burning;
/// assert!(set.has(Status::Burning));
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = $crate::bitmask_flags::BitmaskFlags<$name>;

            fn bitor(self, rhs: Self) -> Self::Output {
                $crate::bitmask_flags::BitmaskFlags::only(self) | rhs
            }
        }
    };
}
