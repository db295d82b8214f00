//! Noders: enumerate the candidate segment pairs of a set of segment
//! strings.
//!
//! [`McIndexNoder`] decomposes the strings into monotone chains,
//! indexes the chain envelopes, and refines every pair of overlapping
//! chains down to pairs of segments. [`SimpleNoder`] tests all pairs
//! and serves as the reference. Both hand the candidates to a
//! [`SegmentIntersector`].
use std::{fmt, ops::ControlFlow};

use geo::{Coordinate, GeoFloat};
use itertools::Itertools;
use log::{debug, trace};

use crate::{
    monotone_chains, ChainIndex, Error, IntersectionCollector, MonotoneChain, NodingScalar,
    SegmentIntersector, SegmentRef, SegmentString,
};

/// Phase of a [`McIndexNoder`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoderState {
    /// No run started, or the last run was rejected during validation.
    Idle,
    /// Building the monotone chains and the chain index.
    Building,
    /// Iterating the overlapping chain pairs.
    Enumerating,
    /// Splitting a chain pair into segment pairs.
    Refining,
    /// Handing a segment pair to the intersector.
    Testing,
    Done,
}

/// Counters of one noding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodingStats {
    /// Number of monotone chains built.
    pub chains: usize,
    /// Number of chain pairs enumerated from the index.
    pub chain_pairs: usize,
    /// Number of segment pairs handed to the intersector.
    pub candidates: usize,
    /// Whether the intersector stopped the run.
    pub stopped_early: bool,
}

impl fmt::Display for NodingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} chains, {} chain pairs, {} candidates",
            self.chains, self.chain_pairs, self.candidates
        )?;
        if self.stopped_early {
            write!(f, " (stopped early)")?;
        }
        Ok(())
    }
}

/// Computes the candidate intersecting segment pairs of a set of
/// segment strings.
pub trait Noder<T: GeoFloat> {
    /// Hand every pair of segments of `strings` that may intersect to
    /// `intersector`.
    ///
    /// The strings are validated before anything is computed; on
    /// error the intersector receives nothing. The run stops as soon
    /// as [`SegmentIntersector::is_done`] returns `true`.
    fn compute_nodes<S: SegmentIntersector<T>>(
        &mut self,
        strings: &[SegmentString<T>],
        intersector: &mut S,
    ) -> Result<NodingStats, Error>;
}

fn validate_strings<T: GeoFloat>(strings: &[SegmentString<T>]) -> Result<(), Error> {
    strings
        .iter()
        .enumerate()
        .try_for_each(|(idx, s)| s.validate(idx))
}

pub(crate) fn build_chains<T: GeoFloat>(strings: &[SegmentString<T>]) -> Vec<MonotoneChain<T>> {
    strings
        .iter()
        .enumerate()
        .flat_map(|(idx, s)| monotone_chains(idx, s.coords()))
        .collect()
}

/// Refine the chain pair `(i, j)` to segment pairs and `test` each of
/// them. A pair `(i, i)` tests the distinct segments of chain `i`
/// against each other.
pub(crate) fn refine_chain_pair<'a, T, F>(
    strings: &'a [SegmentString<T>],
    chains: &[MonotoneChain<T>],
    i: usize,
    j: usize,
    test: &mut F,
) -> ControlFlow<()>
where
    T: GeoFloat,
    F: FnMut(SegmentRef<'a, T>, SegmentRef<'a, T>) -> ControlFlow<()>,
{
    let (a, b) = (&chains[i], &chains[j]);
    let (sa, sb) = (&strings[a.string()], &strings[b.string()]);
    let mut visit = |si, sj| {
        test(
            SegmentRef {
                string: sa,
                string_index: a.string(),
                segment_index: si,
            },
            SegmentRef {
                string: sb,
                string_index: b.string(),
                segment_index: sj,
            },
        )
    };
    if i == j {
        a.compute_self_overlaps(sa.coords(), &mut visit)
    } else {
        a.compute_overlaps(sa.coords(), b, sb.coords(), &mut visit)
    }
}

/// Noder based on monotone chains and an index of their envelopes.
///
/// Runs in `O((n + k) log n)` for `n` segments and `k` candidate
/// pairs on typical inputs; inputs whose chains all overlap degrade
/// to quadratic work.
#[derive(Debug, Clone)]
pub struct McIndexNoder {
    state: NoderState,
}

impl Default for McIndexNoder {
    fn default() -> Self {
        McIndexNoder {
            state: NoderState::Idle,
        }
    }
}

impl McIndexNoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Current phase. `Done` after a completed run.
    pub fn state(&self) -> NoderState {
        self.state
    }
}

impl<T: NodingScalar> Noder<T> for McIndexNoder {
    fn compute_nodes<S: SegmentIntersector<T>>(
        &mut self,
        strings: &[SegmentString<T>],
        intersector: &mut S,
    ) -> Result<NodingStats, Error> {
        self.state = NoderState::Idle;
        validate_strings(strings)?;

        let mut stats = NodingStats::default();
        if intersector.is_done() {
            stats.stopped_early = true;
            self.state = NoderState::Done;
            return Ok(stats);
        }

        self.state = NoderState::Building;
        let chains = build_chains(strings);
        let index = ChainIndex::build(&chains);
        stats.chains = chains.len();
        debug!(
            "mc-index noder: {n} strings, {c} chains",
            n = strings.len(),
            c = chains.len()
        );

        self.state = NoderState::Enumerating;
        for (i, j) in index.overlapping_pairs() {
            stats.chain_pairs += 1;
            trace!("chain pair ({i}, {j})");

            self.state = NoderState::Refining;
            let state = &mut self.state;
            let candidates = &mut stats.candidates;
            let flow = refine_chain_pair(strings, &chains, i, j, &mut |a, b| {
                *state = NoderState::Testing;
                *candidates += 1;
                trace!(
                    "candidate: {}:{} x {}:{}",
                    a.string_index,
                    a.segment_index,
                    b.string_index,
                    b.segment_index
                );
                intersector.on_candidate(a, b);
                if intersector.is_done() {
                    ControlFlow::Break(())
                } else {
                    *state = NoderState::Refining;
                    ControlFlow::Continue(())
                }
            });
            if flow.is_break() {
                stats.stopped_early = true;
                break;
            }
            self.state = NoderState::Enumerating;
        }

        self.state = NoderState::Done;
        debug!("mc-index noder: {stats}");
        Ok(stats)
    }
}

/// Noder testing every pair of segments.
///
/// Quadratic; used as the reference for [`McIndexNoder`] and for small
/// inputs. Pairs are issued in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleNoder;

impl<T: GeoFloat> Noder<T> for SimpleNoder {
    fn compute_nodes<S: SegmentIntersector<T>>(
        &mut self,
        strings: &[SegmentString<T>],
        intersector: &mut S,
    ) -> Result<NodingStats, Error> {
        validate_strings(strings)?;

        let mut stats = NodingStats::default();
        let segments: Vec<_> = strings
            .iter()
            .enumerate()
            .flat_map(|(string_index, string)| {
                (0..string.num_segments()).map(move |segment_index| SegmentRef {
                    string,
                    string_index,
                    segment_index,
                })
            })
            .collect();
        debug!("simple noder: {n} segments", n = segments.len());

        if intersector.is_done() {
            stats.stopped_early = true;
            return Ok(stats);
        }
        for (a, b) in segments.iter().copied().tuple_combinations() {
            stats.candidates += 1;
            intersector.on_candidate(a, b);
            if intersector.is_done() {
                stats.stopped_early = true;
                break;
            }
        }
        debug!("simple noder: {stats}");
        Ok(stats)
    }
}

/// The distinct intersection points of `strings`, in lexicographic
/// order.
///
/// Shorthand for running a [`McIndexNoder`] into an
/// [`IntersectionCollector`].
pub fn intersection_points<T: NodingScalar>(
    strings: &[SegmentString<T>],
) -> Result<Vec<Coordinate<T>>, Error> {
    let mut collector = IntersectionCollector::new();
    McIndexNoder::new().compute_nodes(strings, &mut collector)?;
    Ok(collector.into_coords())
}
