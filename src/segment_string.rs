use std::iter::FromIterator;

use geo::{Coordinate, GeoFloat, Line, LineString};

use crate::Error;

/// A polyline whose segments are noded.
///
/// Segment `i` is `(coords[i], coords[i + 1])`. The string owns its
/// coordinates; noders only read them. Construction does not validate
/// the coordinates: a string with fewer than two coordinates, or with
/// non-finite values, is rejected when a noder starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentString<T: GeoFloat> {
    coords: Vec<Coordinate<T>>,
}

impl<T: GeoFloat> SegmentString<T> {
    pub fn new(coords: Vec<Coordinate<T>>) -> Self {
        SegmentString { coords }
    }

    /// Get a reference to the string's coordinates.
    #[inline]
    pub fn coords(&self) -> &[Coordinate<T>] {
        &self.coords
    }

    /// Number of segments; zero for strings with fewer than two
    /// coordinates.
    #[inline]
    pub fn num_segments(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    /// The segment at `index`.
    ///
    /// Panics if `index >= self.num_segments()`.
    #[inline]
    pub fn segment(&self, index: usize) -> Line<T> {
        Line::new(self.coords[index], self.coords[index + 1])
    }

    /// A string is closed if it has at least three coordinates and
    /// its first and last coordinates are equal.
    pub fn is_closed(&self) -> bool {
        self.coords.len() > 2 && self.coords.first() == self.coords.last()
    }

    /// Check the string is usable as noder input. `string` is its
    /// position in that input, used for error reporting.
    pub(crate) fn validate(&self, string: usize) -> Result<(), Error> {
        if self.coords.len() < 2 {
            return Err(Error::TooFewPoints {
                string,
                len: self.coords.len(),
            });
        }
        if let Some(vertex) = self
            .coords
            .iter()
            .position(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(Error::NonFinite { string, vertex });
        }
        Ok(())
    }
}

impl<T: GeoFloat> From<Line<T>> for SegmentString<T> {
    fn from(l: Line<T>) -> Self {
        SegmentString::new(vec![l.start, l.end])
    }
}

impl<T: GeoFloat> From<LineString<T>> for SegmentString<T> {
    fn from(ls: LineString<T>) -> Self {
        SegmentString::new(ls.0)
    }
}

impl<T: GeoFloat> From<Vec<Coordinate<T>>> for SegmentString<T> {
    fn from(coords: Vec<Coordinate<T>>) -> Self {
        SegmentString::new(coords)
    }
}

impl<T: GeoFloat> FromIterator<Coordinate<T>> for SegmentString<T> {
    fn from_iter<I: IntoIterator<Item = Coordinate<T>>>(iter: I) -> Self {
        SegmentString::new(iter.into_iter().collect())
    }
}

/// One segment of a [`SegmentString`] in the noder input.
///
/// This is what noders hand to a [`SegmentIntersector`] for every
/// candidate pair.
///
/// [`SegmentIntersector`]: crate::SegmentIntersector
#[derive(Debug)]
pub struct SegmentRef<'a, T: GeoFloat> {
    /// The string owning the segment.
    pub string: &'a SegmentString<T>,
    /// Position of `string` in the noder input.
    pub string_index: usize,
    /// Index of the segment within `string`.
    pub segment_index: usize,
}

impl<'a, T: GeoFloat> Clone for SegmentRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, T: GeoFloat> Copy for SegmentRef<'a, T> {}

impl<'a, T: GeoFloat> SegmentRef<'a, T> {
    /// The geometry of the referenced segment.
    #[inline]
    pub fn line(&self) -> Line<T> {
        self.string.segment(self.segment_index)
    }

    /// Whether both refer to the same segment of the same string.
    #[inline]
    pub fn is_same_segment(&self, other: &Self) -> bool {
        self.string_index == other.string_index && self.segment_index == other.segment_index
    }

    /// Whether both are consecutive segments of the same string. The
    /// first and last segments of a closed string are consecutive.
    pub fn is_adjacent(&self, other: &Self) -> bool {
        if self.string_index != other.string_index {
            return false;
        }
        let (i, j) = (self.segment_index, other.segment_index);
        if i.max(j) - i.min(j) == 1 {
            return true;
        }
        if self.string.is_closed() {
            let last = self.string.num_segments() - 1;
            return (i == 0 && j == last) || (j == 0 && i == last);
        }
        false
    }
}
