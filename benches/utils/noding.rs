#![allow(dead_code)]

use geo::{line_intersection::line_intersection, Line};
use geo_noding::{
    IntersectionCollector, IntersectionCounter, McIndexNoder, Noder, SegmentString, SimpleNoder,
};
use rstar::{RTree, RTreeObject};

struct GeomWithData<R: RTreeObject, T>(R, T);

impl<R: RTreeObject, T> RTreeObject for GeomWithData<R, T> {
    type Envelope = R::Envelope;

    fn envelope(&self) -> Self::Envelope {
        self.0.envelope()
    }
}

pub fn to_strings(lines: &[Line<f64>]) -> Vec<SegmentString<f64>> {
    lines.iter().map(|&l| l.into()).collect()
}

pub fn count_mc_index(strings: &[SegmentString<f64>]) -> usize {
    let mut counter = IntersectionCounter::new();
    McIndexNoder::new()
        .compute_nodes(strings, &mut counter)
        .unwrap();
    counter.pairs()
}

pub fn count_simple(strings: &[SegmentString<f64>]) -> usize {
    let mut counter = IntersectionCounter::new();
    SimpleNoder.compute_nodes(strings, &mut counter).unwrap();
    counter.pairs()
}

pub fn distinct_mc_index(strings: &[SegmentString<f64>]) -> usize {
    let mut collector = IntersectionCollector::new();
    McIndexNoder::new()
        .compute_nodes(strings, &mut collector)
        .unwrap();
    collector.len()
}

/// Index the segments themselves, without chains, and intersect with
/// `geo`'s line intersection.
pub fn count_rtree(lines: &[Line<f64>]) -> usize {
    let lines: Vec<_> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| GeomWithData(*l, i))
        .collect();

    let tree = RTree::bulk_load(lines);
    tree.intersection_candidates_with_other_tree(&tree)
        .filter_map(|(l1, l2)| {
            if l1.1 >= l2.1 {
                None
            } else {
                line_intersection(l1.0, l2.0)
            }
        })
        .count()
}
