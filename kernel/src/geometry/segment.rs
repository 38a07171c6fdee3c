use std::cmp::Ordering;

use crate::{
    fixed::Fixed,
    geometry::{AxisBox, Vector2},
};

/// Raw-space cross product of `(a - o)` and `(b - o)`, exact in 64 bits.
#[inline]
pub(crate) fn cross_raw(o: Vector2, a: Vector2, b: Vector2) -> i64 {
    let ax = a.x.raw() as i64 - o.x.raw() as i64;
    let ay = a.y.raw() as i64 - o.y.raw() as i64;
    let bx = b.x.raw() as i64 - o.x.raw() as i64;
    let by = b.y.raw() as i64 - o.y.raw() as i64;
    ax * by - ay * bx
}

#[inline]
fn lexicographic(a: Vector2, b: Vector2) -> Ordering {
    a.x.cmp(&b.x).then(a.y.cmp(&b.y))
}

/// Result of intersecting two segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentIntersection {
    Empty,
    Point(Vector2),
    Segment(LineSegment),
}

/// Directed segment from `start` to `end`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct LineSegment {
    pub start: Vector2,
    pub end: Vector2,
}

impl LineSegment {
    #[inline]
    pub const fn new(start: Vector2, end: Vector2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        Self::new(self.end, self.start)
    }

    #[inline]
    pub fn length_squared_raw(&self) -> i64 {
        (self.end - self.start).length_squared_raw()
    }

    #[inline]
    pub fn translated(self, delta: Vector2) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }

    /// Side of the supporting line `v` lies on: 1, -1, or 0 when collinear.
    ///
    /// With `y` pointing down, 1 means `v` is clockwise from `end` around `start`.
    #[inline]
    pub fn compare(&self, v: Vector2) -> i32 {
        cross_raw(self.start, self.end, v).signum() as i32
    }

    /// Whether `v` lies on the closed segment.
    pub fn contains(&self, v: Vector2) -> bool {
        if self.compare(v) != 0 {
            return false;
        }

        let min_x = self.start.x.min(self.end.x);
        let max_x = self.start.x.max(self.end.x);
        let min_y = self.start.y.min(self.end.y);
        let max_y = self.start.y.max(self.end.y);
        min_x <= v.x && v.x <= max_x && min_y <= v.y && v.y <= max_y
    }

    pub fn is_parallel_to(&self, other: &LineSegment) -> bool {
        let d1 = self.end - self.start;
        let d2 = other.end - other.start;
        cross_raw(Vector2::ZERO, d1, d2) == 0
    }

    /// Bounding box of the two endpoints.
    #[inline]
    pub fn wrapping_box(&self) -> AxisBox {
        AxisBox::new(self.start, Vector2::ZERO, self.end - self.start)
    }

    #[inline]
    fn ordered(&self) -> (Vector2, Vector2) {
        if lexicographic(self.start, self.end) == Ordering::Greater {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        }
    }

    /// Intersection with `other`.
    ///
    /// Collinear segments overlap on the shared portion of their endpoint ranges. Crossing
    /// segments intersect in a single point whose coordinates are floored to the raw grid.
    pub fn intersection(&self, other: &LineSegment) -> SegmentIntersection {
        if self == other {
            return SegmentIntersection::Segment(*self);
        }

        let d1 = self.end - self.start;
        let d2 = other.end - other.start;
        let denom = cross_raw(Vector2::ZERO, d1, d2);

        if denom == 0 {
            if self.compare(other.start) != 0 || self.compare(other.end) != 0 {
                return SegmentIntersection::Empty;
            }

            let (a_lo, a_hi) = self.ordered();
            let (b_lo, b_hi) = other.ordered();
            let lo = if lexicographic(a_lo, b_lo) == Ordering::Less {
                b_lo
            } else {
                a_lo
            };
            let hi = if lexicographic(a_hi, b_hi) == Ordering::Greater {
                b_hi
            } else {
                a_hi
            };

            return match lexicographic(lo, hi) {
                Ordering::Less => SegmentIntersection::Segment(LineSegment::new(lo, hi)),
                Ordering::Equal => SegmentIntersection::Point(lo),
                Ordering::Greater => SegmentIntersection::Empty,
            };
        }

        // start + d1 * t / denom meets other.start + d2 * u / denom
        let t = cross_raw(Vector2::ZERO, other.start - self.start, d2);
        let u = cross_raw(Vector2::ZERO, other.start - self.start, d1);
        let within = |p: i64| {
            if denom > 0 {
                (0..=denom).contains(&p)
            } else {
                (denom..=0).contains(&p)
            }
        };
        if !within(t) || !within(u) {
            return SegmentIntersection::Empty;
        }

        let offset = |start: Fixed, delta: Fixed| -> Fixed {
            let wide = (delta.raw() as i128 * t as i128).div_euclid(denom as i128);
            Fixed::from_raw((start.raw() as i128 + wide) as i32)
        };
        SegmentIntersection::Point(Vector2::new(
            offset(self.start.x, d1.x),
            offset(self.start.y, d1.y),
        ))
    }

    /// Whether a piece of positive length of this segment lies inside the closed box.
    ///
    /// Liang-Barsky clipping with the entry/exit parameters kept as exact fractions.
    pub fn overlaps_box(&self, bx: &AxisBox) -> bool {
        if self.start == self.end {
            return false;
        }

        // (numerator, positive denominator)
        let mut enter: (i128, i128) = (0, 1);
        let mut exit: (i128, i128) = (1, 1);

        let axes = [
            (self.start.x, self.end.x, bx.left(), bx.right()),
            (self.start.y, self.end.y, bx.top(), bx.bottom()),
        ];
        for (p0, p1, lo, hi) in axes {
            let d = p1.raw() as i128 - p0.raw() as i128;
            let to_lo = lo.raw() as i128 - p0.raw() as i128;
            let to_hi = hi.raw() as i128 - p0.raw() as i128;
            if d == 0 {
                if to_lo > 0 || to_hi < 0 {
                    return false;
                }
                continue;
            }

            let (near, far) = if d > 0 {
                ((to_lo, d), (to_hi, d))
            } else {
                ((-to_hi, -d), (-to_lo, -d))
            };
            if near.0 * enter.1 > enter.0 * near.1 {
                enter = near;
            }
            if far.0 * exit.1 < exit.0 * far.1 {
                exit = far;
            }
        }

        enter.0 * exit.1 < exit.0 * enter.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32) -> Vector2 {
        Vector2::from_ints(x, y)
    }

    fn seg(a: (i32, i32), b: (i32, i32)) -> LineSegment {
        LineSegment::new(v(a.0, a.1), v(b.0, b.1))
    }

    #[test]
    fn compare_reports_sides_and_collinearity() {
        let s = seg((0, 0), (10, 0));
        assert_eq!(s.compare(v(5, 3)), 1);
        assert_eq!(s.compare(v(5, -3)), -1);
        assert_eq!(s.compare(v(20, 0)), 0);
    }

    #[test]
    fn contains_requires_collinear_and_in_range() {
        let s = seg((0, 16), (16, 8));
        assert!(s.contains(v(8, 12)));
        assert!(s.contains(v(0, 16)));
        assert!(!s.contains(v(32, 0)));
        assert!(!s.contains(v(8, 13)));
    }

    #[test]
    fn crossing_segments_meet_in_one_point() {
        let a = seg((0, 0), (10, 10));
        let b = seg((0, 10), (10, 0));
        assert_eq!(a.intersection(&b), SegmentIntersection::Point(v(5, 5)));
    }

    #[test]
    fn non_touching_segments_are_empty() {
        let a = seg((0, 0), (4, 4));
        let b = seg((10, 0), (6, 4));
        assert_eq!(a.intersection(&b), SegmentIntersection::Empty);

        let parallel = seg((0, 1), (4, 5));
        assert!(a.is_parallel_to(&parallel));
        assert_eq!(a.intersection(&parallel), SegmentIntersection::Empty);
    }

    #[test]
    fn collinear_segments_overlap_on_shared_range() {
        let a = seg((0, 0), (10, 0));
        let b = seg((15, 0), (5, 0));
        assert_eq!(a.intersection(&b), SegmentIntersection::Segment(seg((5, 0), (10, 0))));

        let touching = seg((10, 0), (12, 0));
        assert_eq!(a.intersection(&touching), SegmentIntersection::Point(v(10, 0)));

        let apart = seg((11, 0), (12, 0));
        assert_eq!(a.intersection(&apart), SegmentIntersection::Empty);
    }

    #[test]
    fn vertical_collinear_overlap_uses_y() {
        let a = seg((3, 0), (3, 8));
        let b = seg((3, 4), (3, 20));
        assert_eq!(a.intersection(&b), SegmentIntersection::Segment(seg((3, 4), (3, 8))));
    }

    #[test]
    fn box_overlap_needs_positive_length_inside() {
        let bx = AxisBox::from_ints(0, 0, 10, 10);
        assert!(seg((-5, 5), (15, 5)).overlaps_box(&bx));
        assert!(seg((0, 16), (16, 8)).overlaps_box(&AxisBox::from_ints(4, 8, 8, 8)));
        // Running along an edge counts, touching a corner does not.
        assert!(seg((0, 10), (10, 10)).overlaps_box(&bx));
        assert!(!seg((10, 10), (20, 20)).overlaps_box(&bx));
        assert!(!seg((11, 0), (11, 10)).overlaps_box(&bx));
        assert!(!seg((5, 5), (5, 5)).overlaps_box(&bx));
    }
}
