//! Computes the intersection points of a collection of line segments
//! and polylines.
//!
//! 1. [Noding](#noding)
//! 1. [Segment Intersection](#segment-intersection)
//! 1. [Monotone Chains](#monotone-chains)
//!
//! # Noding
//!
//! A [`Noder`] enumerates the pairs of segments of a set of
//! [`SegmentString`]s that may intersect and hands each pair to a
//! [`SegmentIntersector`]. [`McIndexNoder`] partitions every string
//! into [monotone chains](#monotone-chains), bulk loads the chain
//! envelopes into an R-tree, and refines each pair of overlapping
//! chains by bisection. This avoids testing most of the `O(n²)` pairs
//! that [`SimpleNoder`] tests.
//!
//! ## Usage
//!
//! Collect the distinct intersection points with an
//! [`IntersectionCollector`]. Other intersectors count intersections
//! ([`IntersectionCounter`]), stop at the first one
//! ([`IntersectionFinder`]), or forward them to a closure
//! ([`EventCollector`]).
//!
//! ```rust
//! use geo::{Coordinate, Line};
//! use geo_noding::{IntersectionCollector, McIndexNoder, Noder, SegmentString};
//!
//! let input: Vec<SegmentString<f64>> = vec![
//!     Line::from([(0., 0.), (5., 5.)]).into(),
//!     Line::from([(0., 5.), (5., 0.)]).into(),
//!     Line::from([(2., 0.), (2., 5.)]).into(),
//!     Line::from([(0., 3.), (5., 3.)]).into(),
//! ];
//! let mut collector = IntersectionCollector::new();
//! McIndexNoder::new().compute_nodes(&input, &mut collector)?;
//! assert_eq!(collector.len(), 4);
//! assert!(collector.contains(Coordinate { x: 2.5, y: 2.5 }));
//! # Ok::<(), geo_noding::Error>(())
//! ```
//!
//! Points are deduplicated by exact equality. The intersection of two
//! segments is computed once per pair, so an intersection shared by
//! three or more segments may be reported as several nearby points
//! when the pairs round differently.
//!
//! # Segment Intersection
//!
//! [`segment_intersection`] classifies a pair of segments using the
//! robust orientation predicate of the `geo` kernel and computes the
//! intersection point or overlap. The result never lies outside the
//! envelopes of the segments, and does not depend on the order of the
//! segments or of their end points.
//!
//! # Monotone Chains
//!
//! A monotone chain is a maximal run of a polyline whose segments all
//! point into the same quadrant. The envelope of any sub-run of a
//! chain is spanned by its two end coordinates, which is what makes
//! the refinement cheap. See [`monotone_chains`].
//!
//! [`Line`]: geo::Line
//! [`Coordinate`]: geo::Coordinate

mod point;
pub use point::LexPoint;

mod error;
pub use error::Error;

mod segment_string;
pub use segment_string::{SegmentRef, SegmentString};

mod intersector;
pub use intersector::{segment_intersection, Classification, SegmentIntersection};

pub mod monotone;
pub use monotone::{monotone_chains, MonotoneChain, MonotoneChains, Quadrant};

mod index;
pub use index::ChainIndex;

mod collector;
pub use collector::{
    CandidateLimit, Deadline, EventCollector, FoundIntersection, IntersectionCollector,
    IntersectionCounter, IntersectionEvent, IntersectionFinder, SegmentIntersector,
};

mod noder;
pub use noder::{intersection_points, McIndexNoder, Noder, NoderState, NodingStats, SimpleNoder};

#[cfg(feature = "parallel")]
pub mod parallel;

/// Scalar types the indexed noders work with.
///
/// Implemented for every [`GeoFloat`](geo::GeoFloat) that `rstar` can
/// index, in particular `f32` and `f64`.
pub trait NodingScalar: geo::GeoFloat + rstar::RTreeNum {}
impl<T: geo::GeoFloat + rstar::RTreeNum> NodingScalar for T {}

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;

pub(crate) mod utils;
