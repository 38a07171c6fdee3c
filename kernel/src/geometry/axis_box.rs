use std::{
    hash::{Hash, Hasher},
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};

use crate::{
    fixed::Fixed,
    geometry::{Interval, LineSegment, Vector2},
};

/// Axis-aligned box stored as `origin` plus relative `mins`/`maxs` offsets.
///
/// Translating a box only moves `origin`. The offsets are not required to be ordered
/// (`mins.x > maxs.x` describes a box extending left of its origin), so every derived
/// accessor resolves the absolute corners `origin + mins` and `origin + maxs` first.
///
/// Equality and hashing compare the absolute footprint, not the stored split: two boxes
/// with different origins but the same corners are equal.
///
/// Serializes as `origin`, `mins`, `maxs`, in that order.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize)]
pub struct AxisBox {
    pub origin: Vector2,
    pub mins: Vector2,
    pub maxs: Vector2,
}

impl AxisBox {
    /// Canonical "no overlap" result: zero origin, zero extents.
    pub const EMPTY: AxisBox = AxisBox::new(Vector2::ZERO, Vector2::ZERO, Vector2::ZERO);

    #[inline]
    pub const fn new(origin: Vector2, mins: Vector2, maxs: Vector2) -> Self {
        Self { origin, mins, maxs }
    }

    /// Box anchored at `origin` spanning `width` x `height` (either may be negative).
    #[inline]
    pub const fn from_origin_size(origin: Vector2, width: Fixed, height: Fixed) -> Self {
        Self::new(origin, Vector2::ZERO, Vector2::new(width, height))
    }

    #[inline]
    pub const fn from_ltwh(left: Fixed, top: Fixed, width: Fixed, height: Fixed) -> Self {
        Self::from_origin_size(Vector2::new(left, top), width, height)
    }

    /// Integer-unit shorthand for content and tests.
    #[inline]
    pub const fn from_ints(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::from_ltwh(
            Fixed::from_int(left),
            Fixed::from_int(top),
            Fixed::from_int(width),
            Fixed::from_int(height),
        )
    }

    /// Box spanning two corner points, anchored at `a`.
    #[inline]
    pub fn from_corners(a: Vector2, b: Vector2) -> Self {
        Self::new(a, Vector2::ZERO, b - a)
    }

    #[inline]
    fn corner_min(&self) -> Vector2 {
        self.origin + self.mins
    }

    #[inline]
    fn corner_max(&self) -> Vector2 {
        self.origin + self.maxs
    }

    #[inline]
    pub fn left(&self) -> Fixed {
        self.corner_min().x.min(self.corner_max().x)
    }

    #[inline]
    pub fn right(&self) -> Fixed {
        self.corner_min().x.max(self.corner_max().x)
    }

    #[inline]
    pub fn top(&self) -> Fixed {
        self.corner_min().y.min(self.corner_max().y)
    }

    #[inline]
    pub fn bottom(&self) -> Fixed {
        self.corner_min().y.max(self.corner_max().y)
    }

    #[inline]
    pub fn left_top(&self) -> Vector2 {
        Vector2::new(self.left(), self.top())
    }

    #[inline]
    pub fn right_top(&self) -> Vector2 {
        Vector2::new(self.right(), self.top())
    }

    #[inline]
    pub fn left_bottom(&self) -> Vector2 {
        Vector2::new(self.left(), self.bottom())
    }

    #[inline]
    pub fn right_bottom(&self) -> Vector2 {
        Vector2::new(self.right(), self.bottom())
    }

    #[inline]
    pub fn center(&self) -> Vector2 {
        Vector2::new(
            (self.left() + self.right()) * Fixed::HALF,
            (self.top() + self.bottom()) * Fixed::HALF,
        )
    }

    #[inline]
    pub fn width(&self) -> Fixed {
        (self.maxs.x - self.mins.x).abs()
    }

    #[inline]
    pub fn height(&self) -> Fixed {
        (self.maxs.y - self.mins.y).abs()
    }

    #[inline]
    pub fn area(&self) -> Fixed {
        self.width() * self.height()
    }

    #[inline]
    pub fn translated(self, delta: Vector2) -> Self {
        Self::new(self.origin + delta, self.mins, self.maxs)
    }

    /// Overlap of the two footprints, or [`AxisBox::EMPTY`] when they are disjoint.
    ///
    /// Boxes that only share an edge produce a zero-area box; test `area()` for overlap.
    pub fn intersection(&self, other: &AxisBox) -> AxisBox {
        let min_x = self.left().max(other.left());
        let max_x = self.right().min(other.right());
        if max_x < min_x {
            return AxisBox::EMPTY;
        }

        let min_y = self.top().max(other.top());
        let max_y = self.bottom().min(other.bottom());
        if max_y < min_y {
            return AxisBox::EMPTY;
        }

        AxisBox::from_ltwh(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Smallest box containing both footprints.
    pub fn union(&self, other: &AxisBox) -> AxisBox {
        let min_x = self.left().min(other.left());
        let max_x = self.right().max(other.right());
        let min_y = self.top().min(other.top());
        let max_y = self.bottom().max(other.bottom());
        AxisBox::from_ltwh(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    #[inline]
    pub fn has_intersection_with(&self, other: &AxisBox) -> bool {
        !self.intersection(other).area().is_zero()
    }

    /// `self` lies entirely within `other`.
    #[inline]
    pub fn is_subset_of(&self, other: &AxisBox) -> bool {
        self.intersection(other) == *self
    }

    /// Closed on the min edges, open on the max edges: `[left, right) x [top, bottom)`.
    pub fn contains_point(&self, p: Vector2) -> bool {
        Interval::semi_open_right(self.left(), self.right()).contains(p.x)
            && Interval::semi_open_right(self.top(), self.bottom()).contains(p.y)
    }

    /// Open on every edge.
    pub fn strictly_contains_point(&self, p: Vector2) -> bool {
        Interval::open(self.left(), self.right()).contains(p.x)
            && Interval::open(self.top(), self.bottom()).contains(p.y)
    }

    /// Moves the top edge down by `clip`.
    #[inline]
    pub fn clip_top(self, clip: Fixed) -> Self {
        Self::new(
            self.origin,
            Vector2::new(self.mins.x, self.mins.y + clip),
            self.maxs,
        )
    }

    /// Moves the bottom edge up by `clip`.
    #[inline]
    pub fn clip_bottom(self, clip: Fixed) -> Self {
        Self::new(
            self.origin,
            self.mins,
            Vector2::new(self.maxs.x, self.maxs.y - clip),
        )
    }

    #[inline]
    pub fn half_left(self) -> Self {
        let mid = (self.mins.x + self.maxs.x) * Fixed::HALF;
        Self::new(self.origin, self.mins, Vector2::new(mid, self.maxs.y))
    }

    #[inline]
    pub fn half_right(self) -> Self {
        let mid = (self.mins.x + self.maxs.x) * Fixed::HALF;
        Self::new(self.origin, Vector2::new(mid, self.mins.y), self.maxs)
    }

    pub fn left_segment(&self) -> LineSegment {
        LineSegment::new(self.left_top(), self.left_bottom())
    }

    pub fn top_segment(&self) -> LineSegment {
        LineSegment::new(self.left_top(), self.right_top())
    }

    pub fn right_segment(&self) -> LineSegment {
        LineSegment::new(self.right_top(), self.right_bottom())
    }

    pub fn bottom_segment(&self) -> LineSegment {
        LineSegment::new(self.left_bottom(), self.right_bottom())
    }

    /// Writes `origin`, `mins`, `maxs` as little-endian raw values.
    pub fn write_le(&self, out: &mut Vec<u8>) {
        self.origin.write_le(out);
        self.mins.write_le(out);
        self.maxs.write_le(out);
    }

    pub fn read_le(bytes: &[u8]) -> Option<(Self, &[u8])> {
        let (origin, rest) = Vector2::read_le(bytes)?;
        let (mins, rest) = Vector2::read_le(rest)?;
        let (maxs, rest) = Vector2::read_le(rest)?;
        Some((Self::new(origin, mins, maxs), rest))
    }
}

impl PartialEq for AxisBox {
    fn eq(&self, other: &Self) -> bool {
        self.left_top() == other.left_top() && self.right_bottom() == other.right_bottom()
    }
}

impl Eq for AxisBox {}

impl Hash for AxisBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left_top().hash(state);
        self.right_bottom().hash(state);
    }
}

impl Add<Vector2> for AxisBox {
    type Output = AxisBox;

    #[inline]
    fn add(self, rhs: Vector2) -> AxisBox {
        self.translated(rhs)
    }
}

impl Sub<Vector2> for AxisBox {
    type Output = AxisBox;

    #[inline]
    fn sub(self, rhs: Vector2) -> AxisBox {
        self.translated(-rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(l: i32, t: i32, w: i32, h: i32) -> AxisBox {
        AxisBox::from_ints(l, t, w, h)
    }

    #[test]
    fn accessors_resolve_unordered_offsets() {
        // Extends 4 units to the left of its origin.
        let left_probe = AxisBox::from_origin_size(Vector2::from_ints(10, 0), Fixed::from_int(-4), Fixed::from_int(8));
        assert_eq!(left_probe.left(), Fixed::from_int(6));
        assert_eq!(left_probe.right(), Fixed::from_int(10));
        assert_eq!(left_probe.width(), Fixed::from_int(4));
        assert_eq!(left_probe, b(6, 0, 4, 8));
    }

    #[test]
    fn equality_uses_absolute_corners() {
        let a = AxisBox::new(Vector2::from_ints(0, 0), Vector2::from_ints(2, 2), Vector2::from_ints(6, 6));
        let c = AxisBox::new(Vector2::from_ints(4, 4), Vector2::from_ints(-2, -2), Vector2::from_ints(2, 2));
        assert_eq!(a, c);
        assert_eq!(a, b(2, 2, 4, 4));
    }

    #[test]
    fn intersection_is_commutative() {
        let pairs = [
            (b(0, 0, 10, 10), b(5, 5, 10, 10)),
            (b(0, 0, 4, 4), b(10, 10, 2, 2)),
            (b(-8, 3, 16, 2), b(0, 0, 1, 100)),
        ];
        for (a, c) in pairs {
            assert_eq!(a.intersection(&c), c.intersection(&a));
        }
        assert_eq!(b(0, 0, 10, 10).intersection(&b(5, 5, 10, 10)), b(5, 5, 5, 5));
    }

    #[test]
    fn disjoint_boxes_intersect_to_empty() {
        let i = b(0, 0, 4, 4).intersection(&b(10, 10, 2, 2));
        assert_eq!(i, AxisBox::EMPTY);
        assert!(i.area().is_zero());
        assert!(b(3, 3, 5, 5).intersection(&AxisBox::EMPTY).area().is_zero());
    }

    #[test]
    fn edge_sharing_boxes_have_zero_area_overlap() {
        let a = b(0, 0, 16, 16);
        let c = b(16, 0, 16, 16);
        assert!(a.intersection(&c).area().is_zero());
        assert!(!a.has_intersection_with(&c));
    }

    #[test]
    fn union_contains_both_operands() {
        let a = b(0, 0, 4, 4);
        let c = b(10, -3, 2, 2);
        let u = a.union(&c);
        assert!(a.is_subset_of(&u));
        assert!(c.is_subset_of(&u));
        assert_eq!(u, b(0, -3, 12, 7));
    }

    #[test]
    fn results_are_translation_invariant() {
        let a = b(0, 0, 10, 10);
        let c = b(5, 5, 10, 10);
        let d = Vector2::new(Fixed::from_ratio(7, 4), Fixed::from_int(-33));
        assert_eq!((a + d).intersection(&(c + d)), a.intersection(&c) + d);
        assert_eq!((a + d).union(&(c + d)), a.union(&c) + d);
    }

    #[test]
    fn point_containment_is_closed_open() {
        let a = b(0, 0, 4, 4);
        assert!(a.contains_point(Vector2::from_ints(0, 0)));
        assert!(!a.contains_point(Vector2::from_ints(4, 2)));
        assert!(!a.strictly_contains_point(Vector2::from_ints(0, 2)));
        assert!(a.strictly_contains_point(Vector2::from_ints(2, 2)));
    }

    #[test]
    fn clips_and_halves_adjust_offsets() {
        let a = b(0, 0, 16, 32);
        assert_eq!(a.clip_top(Fixed::from_int(30)), b(0, 30, 16, 2));
        assert_eq!(a.clip_bottom(Fixed::from_int(2)), b(0, 0, 16, 30));
        assert_eq!(a.half_left(), b(0, 0, 8, 32));
        assert_eq!(a.half_right(), b(8, 0, 8, 32));
    }

    #[test]
    fn serializes_origin_mins_maxs_in_order() {
        let a = AxisBox::from_origin_size(Vector2::from_ints(1, 2), Fixed::from_int(3), Fixed::from_int(4));
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(
            json,
            r#"{"origin":{"x":512,"y":1024},"mins":{"x":0,"y":0},"maxs":{"x":1536,"y":2048}}"#
        );

        let mut bytes = Vec::new();
        a.write_le(&mut bytes);
        assert_eq!(bytes.len(), 24);
        let (back, rest) = AxisBox::read_le(&bytes).unwrap();
        assert!(rest.is_empty());
        assert_eq!(back.origin, a.origin);
        assert_eq!(back.maxs, a.maxs);
    }
}
