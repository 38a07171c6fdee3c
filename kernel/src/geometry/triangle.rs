use serde::{Deserialize, Serialize};

use crate::{
    fixed::Fixed,
    geometry::{AxisBox, Interval, LineSegment, Vector2, segment::cross_raw},
};

/// Right triangle used as the slope primitive.
///
/// The right angle sits at `origin`. The horizontal cathetus runs to `origin + (h, 0)` and
/// the vertical cathetus to `origin + (0, v)`; the signs of `h` and `v` select one of the
/// four orientations. The hypotenuse joins the two cathetus vertices.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct RightTriangle {
    pub origin: Vector2,
    pub h: Fixed,
    pub v: Fixed,
}

impl RightTriangle {
    /// Degenerate "no slope" sentinel.
    pub const EMPTY: RightTriangle = RightTriangle::new(Vector2::ZERO, Fixed::ZERO, Fixed::ZERO);

    #[inline]
    pub const fn new(origin: Vector2, h: Fixed, v: Fixed) -> Self {
        Self { origin, h, v }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    #[inline]
    pub fn h_cathetus_vertex(&self) -> Vector2 {
        self.origin + Vector2::new(self.h, Fixed::ZERO)
    }

    #[inline]
    pub fn v_cathetus_vertex(&self) -> Vector2 {
        self.origin + Vector2::new(Fixed::ZERO, self.v)
    }

    #[inline]
    pub fn h_sign(&self) -> i32 {
        self.h.signum()
    }

    #[inline]
    pub fn v_sign(&self) -> i32 {
        self.v.signum()
    }

    #[inline]
    pub fn h_cathetus_segment(&self) -> LineSegment {
        LineSegment::new(self.origin, self.h_cathetus_vertex())
    }

    #[inline]
    pub fn v_cathetus_segment(&self) -> LineSegment {
        LineSegment::new(self.origin, self.v_cathetus_vertex())
    }

    #[inline]
    pub fn hypotenuse(&self) -> LineSegment {
        LineSegment::new(self.h_cathetus_vertex(), self.v_cathetus_vertex())
    }

    /// Bounding box of the three vertices.
    #[inline]
    pub fn wrapping_box(&self) -> AxisBox {
        AxisBox::new(self.origin, Vector2::ZERO, Vector2::new(self.h, self.v))
    }

    #[inline]
    pub fn left(&self) -> Fixed {
        self.wrapping_box().left()
    }

    #[inline]
    pub fn right(&self) -> Fixed {
        self.wrapping_box().right()
    }

    #[inline]
    pub fn top(&self) -> Fixed {
        self.wrapping_box().top()
    }

    #[inline]
    pub fn bottom(&self) -> Fixed {
        self.wrapping_box().bottom()
    }

    #[inline]
    pub fn translated(self, delta: Vector2) -> Self {
        Self::new(self.origin + delta, self.h, self.v)
    }

    /// `y` of the hypotenuse's supporting line at `x`. Requires a non-zero `h`.
    pub fn hypotenuse_y_at(&self, x: Fixed) -> Fixed {
        let run = x - self.origin.x;
        self.origin.y + self.v - self.v.mul_div(run, self.h)
    }

    /// Point-in-triangle test.
    ///
    /// - `inclusive`: points on the edges count as inside. When false only the open
    ///   interior counts.
    /// - `exclude_hypotenuse`: points on the hypotenuse never count, whatever `inclusive`
    ///   says. Adjacent slope cells share that edge and must not both claim it.
    ///
    /// A triangle with a zero cathetus collapses to the segment (or point) along the other
    /// axis and is tested as such.
    pub fn contains(&self, p: Vector2, inclusive: bool, exclude_hypotenuse: bool) -> bool {
        if exclude_hypotenuse && self.hypotenuse().contains(p) {
            return false;
        }

        if self.h.is_zero() {
            return inclusive
                && p.x == self.origin.x
                && Interval::closed(self.origin.y, self.v_cathetus_vertex().y).contains(p.y);
        }

        if self.v.is_zero() {
            return inclusive
                && p.y == self.origin.y
                && Interval::closed(self.origin.x, self.h_cathetus_vertex().x).contains(p.x);
        }

        let a = self.origin;
        let b = self.h_cathetus_vertex();
        let c = self.v_cathetus_vertex();
        let d1 = cross_raw(a, b, p);
        let d2 = cross_raw(b, c, p);
        let d3 = cross_raw(c, a, p);

        if inclusive {
            let has_neg = d1 < 0 || d2 < 0 || d3 < 0;
            let has_pos = d1 > 0 || d2 > 0 || d3 > 0;
            !(has_neg && has_pos)
        } else {
            (d1 > 0 && d2 > 0 && d3 > 0) || (d1 < 0 && d2 < 0 && d3 < 0)
        }
    }

    /// Whether `bx` overlaps the triangle.
    ///
    /// The box is first cut down to the triangle's bounding box. Its left-top, left-bottom
    /// and right-top corners are then tested inclusively, the right-bottom corner
    /// exclusively, so a box touching the triangle only along a boundary is not a hit.
    pub fn has_intersection_with(&self, bx: &AxisBox, exclude_hypotenuse: bool) -> bool {
        let clipped = bx.intersection(&self.wrapping_box());
        if clipped.area().is_zero() {
            return false;
        }

        self.contains(clipped.left_top(), true, exclude_hypotenuse)
            || self.contains(clipped.left_bottom(), true, exclude_hypotenuse)
            || self.contains(clipped.right_top(), true, exclude_hypotenuse)
            || self.contains(clipped.right_bottom(), false, exclude_hypotenuse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32) -> Vector2 {
        Vector2::from_ints(x, y)
    }

    /// Floor slope falling from height 16 on the left to 8 on the right, inside a 16x16 cell.
    fn slope_16_8() -> RightTriangle {
        RightTriangle::new(v(16, 16), Fixed::from_int(-16), Fixed::from_int(-8))
    }

    #[test]
    fn vertices_are_contained_inclusively() {
        let t = slope_16_8();
        for p in [t.origin, t.h_cathetus_vertex(), t.v_cathetus_vertex()] {
            assert!(t.contains(p, true, false), "{p:?}");
        }
    }

    #[test]
    fn points_outside_the_bounding_box_are_never_contained() {
        let t = slope_16_8();
        for p in [v(-1, 12), v(17, 12), v(8, 7), v(8, 17), v(100, -100)] {
            assert!(!t.contains(p, true, false), "{p:?}");
        }
    }

    #[test]
    fn hypotenuse_points_are_dropped_when_excluded() {
        let t = slope_16_8();
        let on_hyp = v(8, 12);
        assert!(t.hypotenuse().contains(on_hyp));
        assert!(t.contains(on_hyp, true, false));
        assert!(!t.contains(on_hyp, true, true));
        // Just under the surface is solid ground either way.
        assert!(t.contains(v(8, 13), true, true));
    }

    #[test]
    fn exclusive_test_rejects_edges() {
        let t = slope_16_8();
        assert!(!t.contains(v(8, 16), false, false));
        assert!(t.contains(v(12, 14), false, false));
    }

    #[test]
    fn degenerate_triangles_collapse_to_segments() {
        let vertical = RightTriangle::new(v(4, 0), Fixed::ZERO, Fixed::from_int(8));
        assert!(vertical.contains(v(4, 5), true, false));
        assert!(!vertical.contains(v(5, 5), true, false));
        assert!(!vertical.contains(v(4, 9), true, false));

        let horizontal = RightTriangle::new(v(0, 3), Fixed::from_int(-6), Fixed::ZERO);
        assert!(horizontal.contains(v(-6, 3), true, false));
        assert!(!horizontal.contains(v(1, 3), true, false));

        assert!(RightTriangle::EMPTY.contains(Vector2::ZERO, true, false));
        assert!(!RightTriangle::EMPTY.has_intersection_with(&AxisBox::from_ints(-1, -1, 2, 2), false));
    }

    #[test]
    fn boxes_under_the_surface_intersect() {
        let t = slope_16_8();
        assert!(t.has_intersection_with(&AxisBox::from_ints(0, 15, 4, 4), true));
        assert!(t.has_intersection_with(&AxisBox::from_ints(10, 10, 2, 4), true));
    }

    #[test]
    fn boxes_above_the_surface_do_not_intersect() {
        let t = slope_16_8();
        // Entirely in the empty upper half of the cell.
        assert!(!t.has_intersection_with(&AxisBox::from_ints(0, 0, 8, 8), true));
        assert!(!t.has_intersection_with(&AxisBox::from_ints(0, 8, 4, 4), true));
    }

    #[test]
    fn box_resting_on_the_hypotenuse_is_not_a_hit() {
        let t = slope_16_8();
        // Bottom-left corner sits exactly on the surface at x = 8, y = 12.
        let resting = AxisBox::from_ints(8, 4, 8, 8);
        assert!(!t.has_intersection_with(&resting, true));
    }

    #[test]
    fn hypotenuse_height_interpolates_between_edges() {
        let t = slope_16_8();
        assert_eq!(t.hypotenuse_y_at(Fixed::from_int(0)), Fixed::from_int(16));
        assert_eq!(t.hypotenuse_y_at(Fixed::from_int(16)), Fixed::from_int(8));
        assert_eq!(t.hypotenuse_y_at(Fixed::from_int(8)), Fixed::from_int(12));
    }
}
