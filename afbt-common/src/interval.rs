//! Closed-open time ranges and their set algebra
//!
//! **Purpose:** Exact overlap arithmetic on the reference and query time axes.
//!
//! An [`Interval`] is a single `[lower, upper)` range. Operations that can
//! produce more than one range (union, subtraction) return an
//! [`IntervalSet`], which keeps its members sorted, disjoint and with
//! touching ranges merged.
//!
//! Bounds are generic so the same algebra serves whole seconds (`i64`, the
//! boundary type of every input file) and any other exact ordered type.

use std::cmp::{max, min};
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitOrAssign, Sub};

/// Requirements on an interval bound: exact, totally ordered, with a zero.
///
/// `Default::default()` is taken as zero when summing lengths.
pub trait Bound: Copy + Ord + Default + Add<Output = Self> + Sub<Output = Self> {}

impl<T> Bound for T where T: Copy + Ord + Default + Add<Output = T> + Sub<Output = T> {}

/// Closed-open range `[lower, upper)`
///
/// A range with `upper <= lower` is empty. All empty intervals compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval<T = i64> {
    lower: T,
    upper: T,
}

impl<T: Bound> Interval<T> {
    /// Create `[lower, upper)`; an inverted range collapses to the empty interval
    pub fn new(lower: T, upper: T) -> Self {
        if upper <= lower {
            Self::empty()
        } else {
            Self { lower, upper }
        }
    }

    /// The empty interval
    pub fn empty() -> Self {
        Self {
            lower: T::default(),
            upper: T::default(),
        }
    }

    pub fn lower(&self) -> T {
        self.lower
    }

    pub fn upper(&self) -> T {
        self.upper
    }

    pub fn is_empty(&self) -> bool {
        self.upper <= self.lower
    }

    /// Width of the range, zero when empty
    pub fn length(&self) -> T {
        if self.is_empty() {
            T::default()
        } else {
            self.upper - self.lower
        }
    }

    /// Common part of both ranges
    pub fn intersect(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        Self::new(max(self.lower, other.lower), min(self.upper, other.upper))
    }

    /// True when the ranges share at least one point
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    pub fn union(&self, other: &Self) -> IntervalSet<T> {
        let mut set = IntervalSet::from(*self);
        set.insert(*other);
        set
    }

    /// Part of `self` not covered by `other`
    pub fn subtract(&self, other: &IntervalSet<T>) -> IntervalSet<T> {
        IntervalSet::from(*self).subtract(other)
    }
}

impl<T: Bound + fmt::Debug> fmt::Debug for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "()")
        } else {
            write!(f, "[{:?},{:?})", self.lower, self.upper)
        }
    }
}

impl<T: Bound> BitAnd for Interval<T> {
    type Output = Interval<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersect(&rhs)
    }
}

impl<T: Bound> BitOr for Interval<T> {
    type Output = IntervalSet<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(&rhs)
    }
}

/// Union of closed-open ranges
///
/// Invariant: members are non-empty, sorted by lower bound, and separated by
/// a gap (adjacent or overlapping ranges are merged on insert).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IntervalSet<T = i64> {
    ranges: Vec<Interval<T>>,
}

impl<T: Bound> Default for IntervalSet<T> {
    fn default() -> Self {
        Self { ranges: Vec::new() }
    }
}

impl<T: Bound> IntervalSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Sum of member widths
    pub fn length(&self) -> T {
        self.ranges
            .iter()
            .fold(T::default(), |total, range| total + range.length())
    }

    /// Member ranges in ascending order
    pub fn ranges(&self) -> &[Interval<T>] {
        &self.ranges
    }

    /// Add a range, merging it with every member it overlaps or touches
    pub fn insert(&mut self, interval: Interval<T>) {
        if interval.is_empty() {
            return;
        }

        let mut merged = interval;
        let mut kept = Vec::with_capacity(self.ranges.len() + 1);
        for range in self.ranges.drain(..) {
            if range.upper < merged.lower || range.lower > merged.upper {
                kept.push(range);
            } else {
                merged = Interval {
                    lower: min(range.lower, merged.lower),
                    upper: max(range.upper, merged.upper),
                };
            }
        }

        let position = kept.partition_point(|range| range.lower < merged.lower);
        kept.insert(position, merged);
        self.ranges = kept;
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for range in &other.ranges {
            result.insert(*range);
        }
        result
    }

    pub fn intersect(&self, other: &Self) -> Self {
        let mut result = Self::new();
        for a in &self.ranges {
            for b in &other.ranges {
                result.insert(a.intersect(b));
            }
        }
        result
    }

    /// Remove every point covered by `other`
    pub fn subtract(&self, other: &Self) -> Self {
        let mut ranges = Vec::new();

        for piece in &self.ranges {
            let mut lower = piece.lower;
            for cut in &other.ranges {
                if cut.upper <= lower {
                    continue;
                }
                if cut.lower >= piece.upper {
                    break;
                }
                if cut.lower > lower {
                    ranges.push(Interval::new(lower, cut.lower));
                }
                lower = max(lower, cut.upper);
                if lower >= piece.upper {
                    break;
                }
            }
            if lower < piece.upper {
                ranges.push(Interval::new(lower, piece.upper));
            }
        }

        // Cuts only shrink members, so order and gaps survive
        Self { ranges }
    }
}

impl<T: Bound> From<Interval<T>> for IntervalSet<T> {
    fn from(interval: Interval<T>) -> Self {
        let mut set = Self::new();
        set.insert(interval);
        set
    }
}

impl<T: Bound> FromIterator<Interval<T>> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        let mut set = Self::new();
        for interval in iter {
            set.insert(interval);
        }
        set
    }
}

impl<T: Bound> BitOrAssign<Interval<T>> for IntervalSet<T> {
    fn bitor_assign(&mut self, rhs: Interval<T>) {
        self.insert(rhs);
    }
}

impl<T: Bound + fmt::Debug> fmt::Debug for IntervalSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ranges.is_empty() {
            return write!(f, "()");
        }
        let parts: Vec<String> = self.ranges.iter().map(|r| format!("{:?}", r)).collect();
        write!(f, "{}", parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lower: i64, upper: i64) -> Interval {
        Interval::new(lower, upper)
    }

    #[test]
    fn test_zero_width_is_empty() {
        let x = iv(5, 5);
        assert!(x.is_empty());
        assert_eq!(x.length(), 0);
        assert_eq!(x, Interval::empty());
        assert!(!x.overlaps(&iv(0, 10)));
    }

    #[test]
    fn test_inverted_bounds_collapse() {
        assert!(iv(7, 3).is_empty());
        assert_eq!(iv(7, 3), iv(1, 1));
    }

    #[test]
    fn test_intersect_half_open() {
        assert_eq!(iv(0, 10) & iv(5, 15), iv(5, 10));
        // Touching ranges share no point
        assert!((iv(0, 10) & iv(10, 20)).is_empty());
        assert!((iv(0, 10) & Interval::empty()).is_empty());
    }

    #[test]
    fn test_intersect_commutative_and_bounded() {
        let cases = [(iv(0, 10), iv(5, 15)), (iv(3, 4), iv(0, 100)), (iv(0, 2), iv(8, 9))];
        for (a, b) in cases {
            let ab = a.intersect(&b);
            assert_eq!(ab, b.intersect(&a));
            assert!(ab.length() <= a.length().min(b.length()));
        }
    }

    #[test]
    fn test_union_merges_adjacent_and_overlapping() {
        let set = iv(0, 5) | iv(5, 10);
        assert_eq!(set.ranges(), &[iv(0, 10)]);

        let mut set = IntervalSet::new();
        set |= iv(20, 30);
        set |= iv(0, 5);
        set |= iv(25, 40);
        set |= iv(10, 12);
        assert_eq!(set.ranges(), &[iv(0, 5), iv(10, 12), iv(20, 40)]);
        assert_eq!(set.length(), 5 + 2 + 20);

        // Bridging insert swallows several members
        set |= iv(4, 21);
        assert_eq!(set.ranges(), &[iv(0, 40)]);
    }

    #[test]
    fn test_union_idempotent() {
        let set: IntervalSet = [iv(0, 5), iv(8, 9)].into_iter().collect();
        assert_eq!(set.union(&set), set);
    }

    #[test]
    fn test_union_ignores_empty() {
        let set = iv(3, 3) | iv(1, 2);
        assert_eq!(set.ranges(), &[iv(1, 2)]);
    }

    #[test]
    fn test_subtract_splits() {
        let cut: IntervalSet = [iv(2, 4), iv(6, 7)].into_iter().collect();
        let rest = iv(0, 10).subtract(&cut);
        assert_eq!(rest.ranges(), &[iv(0, 2), iv(4, 6), iv(7, 10)]);
        assert_eq!(rest.length(), 7);
    }

    #[test]
    fn test_subtract_everything_and_nothing() {
        assert!(iv(3, 8).subtract(&IntervalSet::from(iv(0, 10))).is_empty());
        assert_eq!(iv(3, 8).subtract(&IntervalSet::new()).ranges(), &[iv(3, 8)]);
        assert!(Interval::empty().subtract(&IntervalSet::from(iv(0, 1))).is_empty());
    }

    #[test]
    fn test_length_partition() {
        // length(a) = length(a & b) + length(a - b)
        let a = iv(10, 30);
        for b in [iv(0, 15), iv(12, 18), iv(25, 50), iv(40, 50), iv(0, 100)] {
            let inside = a.intersect(&b).length();
            let outside = a.subtract(&IntervalSet::from(b)).length();
            assert_eq!(a.length(), inside + outside, "b = {:?}", b);
        }
    }

    #[test]
    fn test_set_intersect() {
        let a: IntervalSet = [iv(0, 10), iv(20, 30)].into_iter().collect();
        let b: IntervalSet = [iv(5, 25)].into_iter().collect();
        assert_eq!(a.intersect(&b).ranges(), &[iv(5, 10), iv(20, 25)]);
    }

    #[test]
    fn test_other_bound_types() {
        let a: Interval<u32> = Interval::new(1, 4);
        let b: Interval<u32> = Interval::new(3, 9);
        assert_eq!((a | b).length(), 8);
        assert_eq!((a & b).length(), 1);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", iv(1, 2) | iv(4, 5)), "[1,2) | [4,5)");
        assert_eq!(format!("{:?}", IntervalSet::<i64>::new()), "()");
    }
}
