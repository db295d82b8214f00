//! Monotone chain decomposition of segment strings.
//!
//! A monotone chain is a maximal run of a segment string whose
//! segments all point into the same [`Quadrant`]. Such a run is
//! monotone in both `x` and `y`, so the envelope of any contiguous
//! sub-run is spanned by its two end coordinates. Noders exploit this
//! to bisect pairs of chains cheaply down to single segments.

mod quadrant;
pub use quadrant::Quadrant;

mod chains;
pub use chains::{monotone_chains, MonotoneChain, MonotoneChains};

mod overlaps;
