use crate::fixed::Fixed;

/// 1D interval with independently open or closed ends.
///
/// Constructors accept their bounds in any order.
#[derive(Clone, Copy, Debug)]
pub struct Interval {
    min: Fixed,
    closed_left: bool,
    max: Fixed,
    closed_right: bool,
}

impl Interval {
    pub const EMPTY: Interval = Interval {
        min: Fixed::ZERO,
        closed_left: false,
        max: Fixed::ZERO,
        closed_right: false,
    };

    #[inline]
    fn make(a: Fixed, closed_left: bool, b: Fixed, closed_right: bool) -> Self {
        Self {
            min: a.min(b),
            closed_left,
            max: a.max(b),
            closed_right,
        }
    }

    /// `(a, b)`
    #[inline]
    pub fn open(a: Fixed, b: Fixed) -> Self {
        Self::make(a, false, b, false)
    }

    /// `[a, b]`
    #[inline]
    pub fn closed(a: Fixed, b: Fixed) -> Self {
        Self::make(a, true, b, true)
    }

    /// `[a, b)`
    #[inline]
    pub fn semi_open_right(a: Fixed, b: Fixed) -> Self {
        Self::make(a, true, b, false)
    }

    /// `(a, b]`
    #[inline]
    pub fn semi_open_left(a: Fixed, b: Fixed) -> Self {
        Self::make(a, false, b, true)
    }

    #[inline]
    pub fn min(&self) -> Fixed {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Fixed {
        self.max
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed_left && self.closed_right
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        if self.is_closed() {
            self.min > self.max
        } else {
            self.min >= self.max
        }
    }

    #[inline]
    pub fn length(&self) -> Fixed {
        self.max - self.min
    }

    pub fn contains(&self, value: Fixed) -> bool {
        let above_min = if self.closed_left {
            value >= self.min
        } else {
            value > self.min
        };
        let below_max = if self.closed_right {
            value <= self.max
        } else {
            value < self.max
        };
        above_min && below_max
    }

    /// Overlap of two intervals. On equal bounds the end is closed only if both ends are.
    pub fn intersection(&self, other: &Interval) -> Interval {
        let (min, closed_left) = match self.min.cmp(&other.min) {
            std::cmp::Ordering::Greater => (self.min, self.closed_left),
            std::cmp::Ordering::Less => (other.min, other.closed_left),
            std::cmp::Ordering::Equal => (self.min, self.closed_left && other.closed_left),
        };
        let (max, closed_right) = match self.max.cmp(&other.max) {
            std::cmp::Ordering::Less => (self.max, self.closed_right),
            std::cmp::Ordering::Greater => (other.max, other.closed_right),
            std::cmp::Ordering::Equal => (self.max, self.closed_right && other.closed_right),
        };

        let result = Interval {
            min,
            closed_left,
            max,
            closed_right,
        };
        if result.is_empty() {
            Interval::EMPTY
        } else {
            result
        }
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() && other.is_empty() {
            return true;
        }
        self.min == other.min
            && self.max == other.max
            && self.closed_left == other.closed_left
            && self.closed_right == other.closed_right
    }
}

impl Eq for Interval {}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(n: i32) -> Fixed {
        Fixed::from_int(n)
    }

    #[test]
    fn endpoints_follow_openness() {
        let open = Interval::open(f(0), f(4));
        assert!(!open.contains(f(0)));
        assert!(open.contains(f(2)));
        assert!(!open.contains(f(4)));

        let closed = Interval::closed(f(4), f(0));
        assert!(closed.contains(f(0)));
        assert!(closed.contains(f(4)));

        let right_open = Interval::semi_open_right(f(0), f(4));
        assert!(right_open.contains(f(0)));
        assert!(!right_open.contains(f(4)));

        let left_open = Interval::semi_open_left(f(0), f(4));
        assert!(!left_open.contains(f(0)));
        assert!(left_open.contains(f(4)));
    }

    #[test]
    fn degenerate_closed_interval_is_a_point() {
        let point = Interval::closed(f(3), f(3));
        assert!(!point.is_empty());
        assert!(point.contains(f(3)));
        assert!(Interval::open(f(3), f(3)).is_empty());
    }

    #[test]
    fn intersection_keeps_the_tighter_ends() {
        let a = Interval::closed(f(0), f(10));
        let b = Interval::open(f(5), f(15));
        let i = a.intersection(&b);
        assert_eq!(i, Interval::make(f(5), false, f(10), true));

        let touching = Interval::semi_open_right(f(0), f(5)).intersection(&Interval::closed(f(5), f(9)));
        assert!(touching.is_empty());
        assert_eq!(touching, Interval::EMPTY);
    }
}
