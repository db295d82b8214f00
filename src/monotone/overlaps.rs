use std::ops::ControlFlow;

use geo::{Coordinate, GeoFloat, Rect};

use super::MonotoneChain;
use crate::utils::envelopes_overlap;

impl<T: GeoFloat> MonotoneChain<T> {
    /// Visit the pairs of segments of `self` and `other` whose
    /// envelopes may overlap.
    ///
    /// `coords` and `other_coords` are the coordinates of the strings
    /// owning the chains. The larger of the two ranges is bisected
    /// until both are single segments; halves whose envelope misses
    /// the other range are dropped. `visit` receives the segment
    /// indices `(i, j)` with `i` in `self` and `j` in `other`, and
    /// may break to stop the traversal.
    pub fn compute_overlaps<F>(
        &self,
        coords: &[Coordinate<T>],
        other: &Self,
        other_coords: &[Coordinate<T>],
        visit: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(usize, usize) -> ControlFlow<()>,
    {
        overlaps(
            coords,
            self.start(),
            self.end(),
            other_coords,
            other.start(),
            other.end(),
            visit,
        )
    }

    /// Visit the pairs of distinct segments of `self` whose envelopes
    /// may overlap, each pair once as `(i, j)` with `i < j`.
    pub fn compute_self_overlaps<F>(&self, coords: &[Coordinate<T>], visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(usize, usize) -> ControlFlow<()>,
    {
        self_overlaps(coords, self.start(), self.end(), visit)
    }
}

/// Envelope of the coordinates `start..=end` of a monotone run.
#[inline]
fn range_envelope<T: GeoFloat>(coords: &[Coordinate<T>], start: usize, end: usize) -> Rect<T> {
    Rect::new(coords[start], coords[end])
}

fn overlaps<T: GeoFloat, F>(
    a: &[Coordinate<T>],
    a_start: usize,
    a_end: usize,
    b: &[Coordinate<T>],
    b_start: usize,
    b_end: usize,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    if !envelopes_overlap(
        &range_envelope(a, a_start, a_end),
        &range_envelope(b, b_start, b_end),
    ) {
        return ControlFlow::Continue(());
    }

    let a_len = a_end - a_start;
    let b_len = b_end - b_start;
    if a_len == 1 && b_len == 1 {
        return visit(a_start, b_start);
    }

    if a_len >= b_len {
        let mid = a_start + a_len / 2;
        overlaps(a, a_start, mid, b, b_start, b_end, visit)?;
        overlaps(a, mid, a_end, b, b_start, b_end, visit)
    } else {
        let mid = b_start + b_len / 2;
        overlaps(a, a_start, a_end, b, b_start, mid, visit)?;
        overlaps(a, a_start, a_end, b, mid, b_end, visit)
    }
}

fn self_overlaps<T: GeoFloat, F>(
    coords: &[Coordinate<T>],
    start: usize,
    end: usize,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    let len = end - start;
    if len < 2 {
        return ControlFlow::Continue(());
    }
    let mid = start + len / 2;
    self_overlaps(coords, start, mid, visit)?;
    self_overlaps(coords, mid, end, visit)?;
    overlaps(coords, start, mid, coords, mid, end, visit)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::thread_rng;

    use super::*;
    use crate::{monotone_chains, random::*, segment_intersection};

    fn segment(coords: &[Coordinate<f64>], i: usize) -> geo::Line<f64> {
        geo::Line::new(coords[i], coords[i + 1])
    }

    #[test]
    fn test_refinement_prunes() {
        let a: Vec<Coordinate<f64>> = (0..=8).map(|i| (i as f64, 0.).into()).collect();
        let b: Vec<Coordinate<f64>> = vec![(2.5, -1.).into(), (2.5, 1.).into()];
        let ca = &monotone_chains(0, &a)[0];
        let cb = &monotone_chains(1, &b)[0];
        assert_eq!(ca.num_segments(), 8);

        let mut visited = vec![];
        let flow = ca.compute_overlaps(&a, cb, &b, &mut |i, j| {
            visited.push((i, j));
            ControlFlow::Continue(())
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(visited, vec![(2, 0)]);
    }

    #[test]
    fn test_break_stops() {
        let a: Vec<Coordinate<f64>> = (0..=8).map(|i| (i as f64, 0.).into()).collect();
        let b: Vec<Coordinate<f64>> = (0..=8).map(|i| (i as f64, 0.).into()).collect();
        let ca = &monotone_chains(0, &a)[0];
        let cb = &monotone_chains(1, &b)[0];

        let mut count = 0;
        let flow = ca.compute_overlaps(&a, cb, &b, &mut |_, _| {
            count += 1;
            if count == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(count, 3);
    }

    #[test]
    fn test_self_overlaps_pairs() {
        let a: Vec<Coordinate<f64>> = (0..=5).map(|i| (i as f64, i as f64).into()).collect();
        let ca = &monotone_chains(0, &a)[0];
        let mut visited = vec![];
        let _ = ca.compute_self_overlaps(&a, &mut |i, j| {
            visited.push((i, j));
            ControlFlow::Continue(())
        });
        visited.sort_unstable();
        // Only consecutive segments touch in a straight run.
        assert_eq!(visited, vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn test_covers_all_intersections() {
        let mut rng = thread_rng();
        for _ in 0..50 {
            let a = random_walk(&mut rng, 32, 1.);
            let b = random_walk(&mut rng, 32, 1.);
            let chains_a = monotone_chains(0, &a);
            let chains_b = monotone_chains(1, &b);

            let mut visited = BTreeSet::new();
            for ca in chains_a.iter() {
                for cb in chains_b.iter() {
                    let _ = ca.compute_overlaps(&a, cb, &b, &mut |i, j| {
                        assert!(visited.insert((i, j)), "pair visited twice");
                        ControlFlow::Continue(())
                    });
                }
            }

            for i in 0..a.len() - 1 {
                for j in 0..b.len() - 1 {
                    if segment_intersection(segment(&a, i), segment(&b, j)).has_intersection() {
                        assert!(visited.contains(&(i, j)), "missed pair ({i}, {j})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_self_covers_all_intersections() {
        let mut rng = thread_rng();
        for _ in 0..50 {
            let a = grid_walk(&mut rng, 48);
            let mut visited = BTreeSet::new();
            for ca in monotone_chains(0, &a).iter() {
                let _ = ca.compute_self_overlaps(&a, &mut |i, j| {
                    assert!(i < j);
                    assert!(visited.insert((i, j)), "pair visited twice");
                    ControlFlow::Continue(())
                });
                for i in ca.segments() {
                    for j in ca.segments().filter(|&j| j > i) {
                        if segment_intersection(segment(&a, i), segment(&a, j)).has_intersection() {
                            assert!(visited.contains(&(i, j)), "missed pair ({i}, {j})");
                        }
                    }
                }
            }
        }
    }
}
