//! Noding on the `rayon` thread pool.
//!
//! The chains and the index are built once on the calling thread. The
//! overlapping chain pairs are then refined in parallel, handing the
//! candidates to a [`SharedSegmentIntersector`], which receives them
//! through `&self` from several threads at once.
use std::{
    collections::BTreeSet,
    ops::ControlFlow,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex, PoisonError,
    },
};

use geo::{Coordinate, GeoFloat};
use log::debug;
use rayon::prelude::*;

use crate::{
    noder::{build_chains, refine_chain_pair},
    ChainIndex, Error, IntersectionEvent, LexPoint, NodingScalar, NodingStats, SegmentRef,
    SegmentString,
};

/// Thread-safe counterpart of [`SegmentIntersector`](crate::SegmentIntersector).
pub trait SharedSegmentIntersector<T: GeoFloat>: Sync {
    fn on_candidate(&self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>);

    #[inline]
    fn is_done(&self) -> bool {
        false
    }
}

/// Collects the distinct intersection points from several threads.
///
/// Same semantics as [`IntersectionCollector`](crate::IntersectionCollector).
/// Optionally reports done once a number of distinct points has been
/// collected.
#[derive(Debug)]
pub struct SharedIntersectionCollector<T: GeoFloat> {
    points: Mutex<BTreeSet<LexPoint<T>>>,
    max_points: Option<usize>,
    done: AtomicBool,
}

impl<T: GeoFloat> Default for SharedIntersectionCollector<T> {
    fn default() -> Self {
        SharedIntersectionCollector {
            points: Mutex::new(BTreeSet::new()),
            max_points: None,
            done: AtomicBool::new(false),
        }
    }
}

impl<T: GeoFloat> SharedIntersectionCollector<T> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Report done once `max` distinct points are collected. More
    /// points may arrive from threads already testing a candidate.
    pub fn with_max_points(max: usize) -> Self {
        SharedIntersectionCollector {
            max_points: Some(max),
            done: AtomicBool::new(max == 0),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The collected points in lexicographic order.
    pub fn into_coords(self) -> Vec<Coordinate<T>> {
        self.points
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .map(Coordinate::from)
            .collect()
    }
}

impl<T: GeoFloat + Send> SharedSegmentIntersector<T> for SharedIntersectionCollector<T> {
    fn on_candidate(&self, a: SegmentRef<'_, T>, b: SegmentRef<'_, T>) {
        let event = IntersectionEvent::compute(a, b);
        if !event.is_interesting() {
            return;
        }
        let mut points = self.points.lock().unwrap_or_else(PoisonError::into_inner);
        points.extend(event.points().into_iter().map(LexPoint::from));
        if let Some(max) = self.max_points {
            if points.len() >= max {
                self.done.store(true, Ordering::Relaxed);
            }
        }
    }

    #[inline]
    fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }
}

/// Parallel version of [`McIndexNoder`](crate::McIndexNoder).
///
/// Candidates are issued in no particular order, so with an
/// intersector that stops early the set of candidates seen is not
/// deterministic. Once `intersector` reports done, the workers skip
/// all remaining chain pairs.
pub fn compute_nodes_parallel<T, S>(
    strings: &[SegmentString<T>],
    intersector: &S,
) -> Result<NodingStats, Error>
where
    T: NodingScalar + Send + Sync,
    S: SharedSegmentIntersector<T>,
{
    for (idx, s) in strings.iter().enumerate() {
        s.validate(idx)?;
    }

    let mut stats = NodingStats::default();
    if intersector.is_done() {
        stats.stopped_early = true;
        return Ok(stats);
    }

    let chains = build_chains(strings);
    let index = ChainIndex::build(&chains);
    let pairs: Vec<_> = index.overlapping_pairs().collect();
    stats.chains = chains.len();
    stats.chain_pairs = pairs.len();
    debug!(
        "parallel noder: {c} chains, {p} chain pairs",
        c = chains.len(),
        p = pairs.len()
    );

    let candidates = AtomicUsize::new(0);
    let stopped = AtomicBool::new(false);
    pairs.par_iter().for_each(|&(i, j)| {
        if stopped.load(Ordering::Relaxed) {
            return;
        }
        let flow = refine_chain_pair(strings, &chains, i, j, &mut |a, b| {
            if stopped.load(Ordering::Relaxed) {
                return ControlFlow::Break(());
            }
            candidates.fetch_add(1, Ordering::Relaxed);
            intersector.on_candidate(a, b);
            if intersector.is_done() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        if flow.is_break() {
            stopped.store(true, Ordering::Relaxed);
        }
    });

    stats.candidates = candidates.into_inner();
    stats.stopped_early = stopped.into_inner();
    debug!("parallel noder: {stats}");
    Ok(stats)
}
