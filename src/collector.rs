//! Consumers of the candidate segment pairs produced by noders.
//!
//! A noder only decides *which* pairs of segments may intersect; what
//! happens to a candidate is up to the [`SegmentIntersector`] passed to
//! it. The implementations here cover the common uses: collect the
//! distinct intersection points, count intersections, stop at the
//! first intersection, or forward every intersection to a closure.
//! [`CandidateLimit`] and [`Deadline`] wrap another intersector to stop
//! a run early.

use std::{
    collections::BTreeSet,
    marker::PhantomData,
    time::{Duration, Instant},
};

use geo::{Coordinate, GeoFloat};
use smallvec::SmallVec;

use crate::{segment_intersection, LexPoint, SegmentIntersection, SegmentRef};

/// Handler for candidate pairs of segments.
///
/// Noders call [`on_candidate`](Self::on_candidate) for every pair of
/// segments that may intersect, and poll
/// [`is_done`](Self::is_done) after each call; once it returns `true`
/// no further candidates are issued.
pub trait SegmentIntersector<T: GeoFloat> {
    fn on_candidate(&mut self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>);

    #[inline]
    fn is_done(&self) -> bool {
        false
    }
}

impl<'s, T: GeoFloat, S: SegmentIntersector<T> + ?Sized> SegmentIntersector<T> for &'s mut S {
    #[inline]
    fn on_candidate(&mut self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>) {
        (**self).on_candidate(a, b)
    }

    #[inline]
    fn is_done(&self) -> bool {
        (**self).is_done()
    }
}

/// The intersection of a candidate pair of segments.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionEvent<'a, T: GeoFloat> {
    pub a: SegmentRef<'a, T>,
    pub b: SegmentRef<'a, T>,
    pub intersection: SegmentIntersection<T>,
}

impl<'a, T: GeoFloat> IntersectionEvent<'a, T> {
    /// Intersect the two referenced segments.
    pub fn compute(a: SegmentRef<'a, T>, b: SegmentRef<'a, T>) -> Self {
        let intersection = if a.is_same_segment(&b) {
            SegmentIntersection::Disjoint
        } else {
            segment_intersection(a.line(), b.line())
        };
        IntersectionEvent { a, b, intersection }
    }

    /// An intersection is trivial if it is only the shared vertex of
    /// two consecutive segments of one string.
    pub fn is_trivial(&self) -> bool {
        self.a.is_adjacent(&self.b) && self.intersection.num_points() == 1
    }

    /// Whether the event carries a non-trivial intersection.
    #[inline]
    pub fn is_interesting(&self) -> bool {
        self.intersection.has_intersection() && !self.is_trivial()
    }

    #[inline]
    pub fn points(&self) -> SmallVec<[Coordinate<T>; 2]> {
        self.intersection.points()
    }
}

/// Collects the distinct intersection points.
///
/// Points are deduplicated by exact coordinate equality: intersections
/// that coincide mathematically but were computed to different
/// floating point values are kept apart. Trivial intersections (see
/// [`IntersectionEvent::is_trivial`]) are ignored.
#[derive(Debug, Clone)]
pub struct IntersectionCollector<T: GeoFloat> {
    points: BTreeSet<LexPoint<T>>,
}

impl<T: GeoFloat> Default for IntersectionCollector<T> {
    fn default() -> Self {
        IntersectionCollector {
            points: BTreeSet::new(),
        }
    }
}

impl<T: GeoFloat> IntersectionCollector<T> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of distinct points collected.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, coord: Coordinate<T>) -> bool {
        self.points.contains(&coord.into())
    }

    /// The collected points in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate<T>> + '_ {
        self.points.iter().map(|p| p.coord())
    }

    pub fn into_coords(self) -> Vec<Coordinate<T>> {
        self.points.into_iter().map(Coordinate::from).collect()
    }

    pub(crate) fn extend_points<I: IntoIterator<Item = Coordinate<T>>>(&mut self, points: I) {
        self.points.extend(points.into_iter().map(LexPoint::from));
    }
}

impl<T: GeoFloat> SegmentIntersector<T> for IntersectionCollector<T> {
    fn on_candidate(&mut self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>) {
        let event = IntersectionEvent::compute(a, b);
        if event.is_interesting() {
            self.extend_points(event.points());
        }
    }
}

/// Counts intersections without storing them.
///
/// Every intersecting candidate pair counts once in
/// [`pairs`](Self::pairs); [`points`](Self::points) adds one for a
/// point intersection and one per end point of a collinear overlap.
/// Trivial intersections are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntersectionCounter {
    pairs: usize,
    points: usize,
}

impl IntersectionCounter {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn pairs(&self) -> usize {
        self.pairs
    }

    #[inline]
    pub fn points(&self) -> usize {
        self.points
    }
}

impl<T: GeoFloat> SegmentIntersector<T> for IntersectionCounter {
    fn on_candidate(&mut self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>) {
        let event = IntersectionEvent::compute(a, b);
        if event.is_interesting() {
            self.pairs += 1;
            self.points += event.intersection.num_points();
        }
    }
}

/// Location of an intersection found by [`IntersectionFinder`].
#[derive(Debug, Clone, PartialEq)]
pub struct FoundIntersection<T: GeoFloat> {
    /// `(string index, segment index)` of the first segment.
    pub a: (usize, usize),
    /// `(string index, segment index)` of the second segment.
    pub b: (usize, usize),
    pub intersection: SegmentIntersection<T>,
}

/// Stops the noder at the first non-trivial intersection.
#[derive(Debug, Clone)]
pub struct IntersectionFinder<T: GeoFloat> {
    proper_only: bool,
    found: Option<FoundIntersection<T>>,
}

impl<T: GeoFloat> Default for IntersectionFinder<T> {
    fn default() -> Self {
        IntersectionFinder {
            proper_only: false,
            found: None,
        }
    }
}

impl<T: GeoFloat> IntersectionFinder<T> {
    /// Stop at any intersection.
    pub fn new() -> Self {
        Default::default()
    }

    /// Stop only at an intersection interior to both segments.
    pub fn proper() -> Self {
        IntersectionFinder {
            proper_only: true,
            found: None,
        }
    }

    #[inline]
    pub fn has_intersection(&self) -> bool {
        self.found.is_some()
    }

    /// Get a reference to the found intersection.
    pub fn found(&self) -> Option<&FoundIntersection<T>> {
        self.found.as_ref()
    }
}

impl<T: GeoFloat> SegmentIntersector<T> for IntersectionFinder<T> {
    fn on_candidate(&mut self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>) {
        if self.found.is_some() {
            return;
        }
        let event = IntersectionEvent::compute(a, b);
        if !event.is_interesting() {
            return;
        }
        if self.proper_only
            && !matches!(
                event.intersection,
                SegmentIntersection::Point {
                    is_proper: true,
                    ..
                }
            )
        {
            return;
        }
        self.found = Some(FoundIntersection {
            a: (a.string_index, a.segment_index),
            b: (b.string_index, b.segment_index),
            intersection: event.intersection,
        });
    }

    #[inline]
    fn is_done(&self) -> bool {
        self.found.is_some()
    }
}

/// Forwards every non-trivial [`IntersectionEvent`] to a closure.
pub struct EventCollector<T, F> {
    f: F,
    _marker: PhantomData<fn(T)>,
}

impl<T: GeoFloat, F: FnMut(&IntersectionEvent<'_, T>)> EventCollector<T, F> {
    pub fn new(f: F) -> Self {
        EventCollector {
            f,
            _marker: PhantomData,
        }
    }
}

impl<T: GeoFloat, F: FnMut(&IntersectionEvent<'_, T>)> SegmentIntersector<T>
    for EventCollector<T, F>
{
    fn on_candidate(&mut self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>) {
        let event = IntersectionEvent::compute(a, b);
        if event.is_interesting() {
            (self.f)(&event);
        }
    }
}

/// Wraps an intersector and reports done after `limit` candidates.
#[derive(Debug, Clone)]
pub struct CandidateLimit<S> {
    inner: S,
    limit: usize,
    seen: usize,
}

impl<S> CandidateLimit<S> {
    pub fn new(inner: S, limit: usize) -> Self {
        CandidateLimit {
            inner,
            limit,
            seen: 0,
        }
    }

    /// Number of candidates received so far.
    #[inline]
    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<T: GeoFloat, S: SegmentIntersector<T>> SegmentIntersector<T> for CandidateLimit<S> {
    fn on_candidate(&mut self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>) {
        self.seen += 1;
        self.inner.on_candidate(a, b);
    }

    fn is_done(&self) -> bool {
        self.seen >= self.limit || self.inner.is_done()
    }
}

/// Wraps an intersector and reports done once a wall-clock budget is
/// used up.
///
/// The clock starts when the wrapper is created. The budget is only
/// checked between candidates.
#[derive(Debug, Clone)]
pub struct Deadline<S> {
    inner: S,
    deadline: Instant,
}

impl<S> Deadline<S> {
    pub fn new(inner: S, budget: Duration) -> Self {
        Deadline {
            inner,
            deadline: Instant::now() + budget,
        }
    }

    pub fn timed_out(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<T: GeoFloat, S: SegmentIntersector<T>> SegmentIntersector<T> for Deadline<S> {
    #[inline]
    fn on_candidate(&mut self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>) {
        self.inner.on_candidate(a, b);
    }

    fn is_done(&self) -> bool {
        self.inner.is_done() || self.timed_out()
    }
}
