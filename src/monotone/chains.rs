use std::{iter::FusedIterator, ops::Range};

use geo::{Coordinate, GeoFloat, Rect};

use super::Quadrant;

/// A contiguous run of a segment string whose segments all point
/// into the same [`Quadrant`].
///
/// The chain covers the coordinates `start..=end` of its string, i.e.
/// the segments `start..end`. Consecutive chains of a string share
/// their boundary coordinate. Chains do not own coordinates; they
/// refer to the string by its position in the noder input.
#[derive(Debug, Clone, PartialEq)]
pub struct MonotoneChain<T: GeoFloat> {
    string: usize,
    start: usize,
    end: usize,
    envelope: Rect<T>,
}

impl<T: GeoFloat> MonotoneChain<T> {
    /// Position of the owning string in the noder input.
    #[inline]
    pub fn string(&self) -> usize {
        self.string
    }

    /// Index of the first coordinate.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the last coordinate (inclusive).
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Bounding box of all coordinates of the chain.
    #[inline]
    pub fn envelope(&self) -> Rect<T> {
        self.envelope
    }

    #[inline]
    pub fn num_segments(&self) -> usize {
        self.end - self.start
    }

    /// Indices of the segments of the chain in its string.
    #[inline]
    pub fn segments(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Iterator over the monotone chains of a coordinate sequence.
///
/// Walks the coordinates once. A chain is extended while the
/// direction of each non-degenerate segment stays in the quadrant of
/// the first non-degenerate segment of the chain; zero-length
/// segments never end a chain. A sequence of coincident coordinates
/// yields a single degenerate chain. Yields nothing for fewer than two
/// coordinates.
#[derive(Debug, Clone)]
pub struct MonotoneChains<'a, T: GeoFloat> {
    string: usize,
    coords: &'a [Coordinate<T>],
    start: usize,
}

impl<'a, T: GeoFloat> MonotoneChains<'a, T> {
    pub fn new(string: usize, coords: &'a [Coordinate<T>]) -> Self {
        MonotoneChains {
            string,
            coords,
            start: 0,
        }
    }
}

impl<'a, T: GeoFloat> Iterator for MonotoneChains<'a, T> {
    type Item = MonotoneChain<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let coords = self.coords;
        let start = self.start;
        if start + 1 >= coords.len() {
            return None;
        }

        let mut min = coords[start];
        let mut max = coords[start];
        let mut chain_quadrant = None;
        let mut last = start;
        while last + 1 < coords.len() {
            if let Some(quadrant) = Quadrant::of(coords[last], coords[last + 1]) {
                match chain_quadrant {
                    None => chain_quadrant = Some(quadrant),
                    Some(q) if q != quadrant => break,
                    _ => {}
                }
            }
            last += 1;

            let c = coords[last];
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        debug_assert!(last > start);

        self.start = last;
        Some(MonotoneChain {
            string: self.string,
            start,
            end: last,
            envelope: Rect::new(min, max),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.coords.len().saturating_sub(self.start + 1);
        ((remaining > 0) as usize, Some(remaining))
    }
}

impl<'a, T: GeoFloat> FusedIterator for MonotoneChains<'a, T> {}

/// Collect the monotone chains of the coordinates of string `string`.
pub fn monotone_chains<T: GeoFloat>(
    string: usize,
    coords: &[Coordinate<T>],
) -> Vec<MonotoneChain<T>> {
    MonotoneChains::new(string, coords).collect()
}
