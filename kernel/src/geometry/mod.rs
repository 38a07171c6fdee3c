/*!
Fixed-point 2D geometry.

Pure value types shared by every collision routine:

- vector:   `Vector2`, points and displacements (`y` grows downward)
- interval: open/closed 1D ranges used by containment tests
- axis_box: `AxisBox`, origin-relative axis-aligned boxes
- triangle: `RightTriangle`, the slope primitive
- segment:  `LineSegment` and segment intersection

All arithmetic goes through [`Fixed`](crate::fixed::Fixed); cross products are evaluated
on raw values in 64 bits so orientation tests are exact.
*/

pub mod axis_box;
pub mod interval;
pub mod segment;
pub mod triangle;
pub mod vector;

pub use axis_box::AxisBox;
pub use interval::Interval;
pub use segment::{LineSegment, SegmentIntersection};
pub use triangle::RightTriangle;
pub use vector::Vector2;

/// Discriminant of a [`Geometry`] value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Vector,
    Box,
    Triangle,
    Segment,
}

/// Any one of the concrete geometry values.
///
/// Only for call sites that really need heterogeneous handling (debug overlays, editor
/// picking). Collision code takes the concrete types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Geometry {
    Vector(Vector2),
    Box(AxisBox),
    Triangle(RightTriangle),
    Segment(LineSegment),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Vector(_) => GeometryKind::Vector,
            Geometry::Box(_) => GeometryKind::Box,
            Geometry::Triangle(_) => GeometryKind::Triangle,
            Geometry::Segment(_) => GeometryKind::Segment,
        }
    }

    /// Smallest axis-aligned box covering the value. Points yield a zero-size box.
    pub fn wrapping_box(&self) -> AxisBox {
        match *self {
            Geometry::Vector(v) => AxisBox::new(v, Vector2::ZERO, Vector2::ZERO),
            Geometry::Box(b) => b,
            Geometry::Triangle(t) => t.wrapping_box(),
            Geometry::Segment(s) => s.wrapping_box(),
        }
    }

    pub fn translated(self, delta: Vector2) -> Geometry {
        match self {
            Geometry::Vector(v) => Geometry::Vector(v + delta),
            Geometry::Box(b) => Geometry::Box(b.translated(delta)),
            Geometry::Triangle(t) => Geometry::Triangle(t.translated(delta)),
            Geometry::Segment(s) => Geometry::Segment(s.translated(delta)),
        }
    }
}

impl From<Vector2> for Geometry {
    fn from(v: Vector2) -> Self {
        Geometry::Vector(v)
    }
}

impl From<AxisBox> for Geometry {
    fn from(b: AxisBox) -> Self {
        Geometry::Box(b)
    }
}

impl From<RightTriangle> for Geometry {
    fn from(t: RightTriangle) -> Self {
        Geometry::Triangle(t)
    }
}

impl From<LineSegment> for Geometry {
    fn from(s: LineSegment) -> Self {
        Geometry::Segment(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fixed;

    #[test]
    fn wrapping_box_covers_each_variant() {
        let tri = RightTriangle::new(Vector2::from_ints(16, 16), Fixed::from_int(-16), Fixed::from_int(-8));
        assert_eq!(Geometry::from(tri).wrapping_box(), AxisBox::from_ints(0, 8, 16, 8));

        let seg = LineSegment::new(Vector2::from_ints(4, 0), Vector2::from_ints(0, 4));
        assert_eq!(Geometry::from(seg).wrapping_box(), AxisBox::from_ints(0, 0, 4, 4));

        let p = Vector2::from_ints(3, 3);
        assert!(Geometry::from(p).wrapping_box().area().is_zero());
    }

    #[test]
    fn translation_preserves_kind() {
        let g = Geometry::from(AxisBox::from_ints(0, 0, 2, 2)).translated(Vector2::from_ints(5, 5));
        assert_eq!(g.kind(), GeometryKind::Box);
        assert_eq!(g.wrapping_box(), AxisBox::from_ints(5, 5, 2, 2));
    }
}
