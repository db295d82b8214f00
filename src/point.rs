use std::cmp::Ordering;

use geo::{Coordinate, GeoFloat};

/// Wraps a [`Coordinate`] to support lexicographic ordering.
///
/// The ordering is by `x` and then by `y`. Implements `PartialOrd`,
/// `Ord` and `Eq` even though `Coordinate` doesn't implement these.
/// This is what lets intersection points live in ordered sets, and
/// what orders the end points of collinear segments.
///
/// Note that the trait impls exist even when `T` is not `Eq` or
/// `Ord`. Construction asserts that both components are finite, so
/// the ordering is always total.
#[derive(Debug, Clone, Copy)]
pub struct LexPoint<T: GeoFloat>(Coordinate<T>);

impl<T: GeoFloat> LexPoint<T> {
    /// The wrapped coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate<T> {
        self.0
    }
}

/// Exact equality of both components; `-0.0` equals `0.0`.
impl<T: GeoFloat> PartialEq for LexPoint<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.x == other.0.x && self.0.y == other.0.y
    }
}

/// We derive `Eq` manually to not require `T: Eq`.
impl<T: GeoFloat> Eq for LexPoint<T> {}

/// Implement lexicographic ordering by `x` and then by `y`
/// coordinate.
impl<T: GeoFloat> PartialOrd for LexPoint<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: GeoFloat> Ord for LexPoint<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Components are finite, so `partial_cmp` never fails.
        match self.0.x.partial_cmp(&other.0.x) {
            Some(Ordering::Equal) | None => self
                .0
                .y
                .partial_cmp(&other.0.y)
                .unwrap_or(Ordering::Equal),
            Some(o) => o,
        }
    }
}

/// Create from `Coordinate` while checking the components are finite.
impl<T: GeoFloat> From<Coordinate<T>> for LexPoint<T> {
    fn from(pt: Coordinate<T>) -> Self {
        assert!(pt.x.is_finite(), "lex point requires a finite x-coordinate");
        assert!(pt.y.is_finite(), "lex point requires a finite y-coordinate");
        LexPoint(pt)
    }
}

impl<T: GeoFloat> From<LexPoint<T>> for Coordinate<T> {
    fn from(pt: LexPoint<T>) -> Self {
        pt.0
    }
}
