use geo::Rect;
use log::debug;
use rstar::{RTree, RTreeObject, AABB};

use crate::{MonotoneChain, NodingScalar};

/// An entry of the [`ChainIndex`]: the position of a chain in the
/// chain list, with its envelope.
#[derive(Debug, Clone)]
struct IndexedChain<T: NodingScalar> {
    id: usize,
    envelope: AABB<[T; 2]>,
}

impl<T: NodingScalar> RTreeObject for IndexedChain<T> {
    type Envelope = AABB<[T; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope.clone()
    }
}

#[inline]
fn rect_as_aabb<T: NodingScalar>(rect: Rect<T>) -> AABB<[T; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// Bounding-volume index over the envelopes of monotone chains.
///
/// The index is bulk loaded once (sort-tile-recursive packing) and is
/// read-only afterwards; it may be queried concurrently.
pub struct ChainIndex<T: NodingScalar> {
    tree: RTree<IndexedChain<T>>,
    self_pairs: Vec<usize>,
}

impl<T: NodingScalar> ChainIndex<T> {
    /// Bulk load the envelopes of `chains`. Chains are identified by
    /// their position in the slice.
    pub fn build(chains: &[MonotoneChain<T>]) -> Self {
        let entries: Vec<_> = chains
            .iter()
            .enumerate()
            .map(|(id, chain)| IndexedChain {
                id,
                envelope: rect_as_aabb(chain.envelope()),
            })
            .collect();
        let self_pairs = chains
            .iter()
            .enumerate()
            .filter_map(|(id, chain)| (chain.num_segments() > 1).then(|| id))
            .collect();
        let tree = RTree::bulk_load(entries);
        debug!("chain index: bulk loaded {n} chains", n = tree.size());
        ChainIndex { tree, self_pairs }
    }

    /// Number of indexed chains.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the pairs of chains that need to be refined.
    ///
    /// Yields every unordered pair of distinct chains with overlapping
    /// envelopes once, as `(i, j)` with `i < j`, and `(i, i)` for every
    /// chain with at least two segments (so that its non-adjacent
    /// segments are tested against each other). The pairs are
    /// produced lazily.
    pub fn overlapping_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.tree
            .intersection_candidates_with_other_tree(&self.tree)
            .filter_map(|(a, b)| (a.id < b.id).then(|| (a.id, b.id)))
            .chain(self.self_pairs.iter().map(|&id| (id, id)))
    }
}
