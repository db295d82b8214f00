//! Robust intersection of two line segments.
//!
//! The qualitative outcome (disjoint, touching, crossing or
//! collinear) is decided solely from orientation signs computed by
//! the [`Kernel`] of the scalar type. For `f64` this is an
//! adaptive-precision predicate. Each pair is first scaled by a power
//! of two so that its largest coordinate magnitude is near one, which
//! keeps the predicate free of overflow and underflow. The
//! classification is therefore exact unless the coordinates of a
//! pair span more than the normal exponent range (a value below
//! `2^-1022` times the largest one is rounded when scaled).
//! Only the location of a proper crossing is computed with rounded
//! arithmetic, and that location is kept inside the envelopes of
//! both segments.

use geo::{
    kernels::{HasKernel, Kernel, Orientation},
    Coordinate, GeoFloat, Line, Rect,
};
use smallvec::SmallVec;

use crate::{
    utils::{clamp_to_envelope, envelopes_overlap},
    LexPoint,
};

/// Kind of intersection between two segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    NoIntersection,
    PointIntersection,
    CollinearOverlap,
}

/// Result of intersecting two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection<T: GeoFloat> {
    /// The segments do not meet.
    Disjoint,
    /// The segments meet in exactly one point.
    ///
    /// `is_proper` is set if the point is interior to both segments,
    /// i.e. no end point of either segment lies on the other.
    Point {
        intersection: Coordinate<T>,
        is_proper: bool,
    },
    /// The segments are collinear and share the closed range
    /// `start..=end` (lexicographically ordered). If they only touch
    /// at an end point, `start == end`.
    Collinear {
        start: Coordinate<T>,
        end: Coordinate<T>,
    },
}

impl<T: GeoFloat> SegmentIntersection<T> {
    pub fn classification(&self) -> Classification {
        match self {
            SegmentIntersection::Disjoint => Classification::NoIntersection,
            SegmentIntersection::Point { .. } => Classification::PointIntersection,
            SegmentIntersection::Collinear { .. } => Classification::CollinearOverlap,
        }
    }

    #[inline]
    pub fn has_intersection(&self) -> bool {
        !matches!(self, SegmentIntersection::Disjoint)
    }

    /// The distinct intersection points: none, one, or the two end
    /// points of a collinear overlap.
    pub fn points(&self) -> SmallVec<[Coordinate<T>; 2]> {
        let mut points = SmallVec::new();
        match *self {
            SegmentIntersection::Disjoint => {}
            SegmentIntersection::Point { intersection, .. } => points.push(intersection),
            SegmentIntersection::Collinear { start, end } => {
                points.push(start);
                if start != end {
                    points.push(end);
                }
            }
        }
        points
    }

    /// Number of entries in [`Self::points`].
    pub fn num_points(&self) -> usize {
        match self {
            SegmentIntersection::Disjoint => 0,
            SegmentIntersection::Point { .. } => 1,
            SegmentIntersection::Collinear { start, end } => {
                if start == end {
                    1
                } else {
                    2
                }
            }
        }
    }
}

/// Intersect two segments.
///
/// Zero-length segments are treated as points. The result does not
/// depend on the order of the arguments nor on the direction of
/// either segment: both are brought to a canonical form before any
/// arithmetic happens.
///
/// Panics if any coordinate is not finite.
pub fn segment_intersection<T: GeoFloat>(p: Line<T>, q: Line<T>) -> SegmentIntersection<T> {
    use Orientation::Collinear;
    use SegmentIntersection::*;

    let (p, q) = canonical_pair(p, q);
    let (p_env, q_env) = (Rect::new(p.start, p.end), Rect::new(q.start, q.end));
    if !envelopes_overlap(&p_env, &q_env) {
        return Disjoint;
    }

    let scale = Scale::new(&p, &q);
    let (sp, sq) = (scale.line(p), scale.line(q));

    match (p.start == p.end, q.start == q.end) {
        (true, true) => {
            // Overlapping envelopes of two points means they're equal.
            return Point {
                intersection: p.start,
                is_proper: false,
            };
        }
        (true, false) => {
            return point_on_segment(p.start, orient2d(sq.start, sq.end, sp.start));
        }
        (false, true) => {
            return point_on_segment(q.start, orient2d(sp.start, sp.end, sq.start));
        }
        _ => {}
    }

    let p_start = orient2d(sq.start, sq.end, sp.start);
    let p_end = orient2d(sq.start, sq.end, sp.end);
    if p_start != Collinear && p_start == p_end {
        return Disjoint;
    }
    let q_start = orient2d(sp.start, sp.end, sq.start);
    let q_end = orient2d(sp.start, sp.end, sq.end);
    if q_start != Collinear && q_start == q_end {
        return Disjoint;
    }

    if [p_start, p_end, q_start, q_end]
        .iter()
        .all(|&o| o == Collinear)
    {
        return collinear_intersection(p, q);
    }

    if [p_start, p_end, q_start, q_end]
        .iter()
        .any(|&o| o == Collinear)
    {
        // An end point lies on the other segment. Since the lines are
        // not collinear, it is the unique intersection and we return
        // it verbatim.
        let intersection = if p.start == q.start || p.start == q.end {
            p.start
        } else if p.end == q.start || p.end == q.end {
            p.end
        } else if q_start == Collinear {
            q.start
        } else if q_end == Collinear {
            q.end
        } else if p_start == Collinear {
            p.start
        } else {
            p.end
        };
        return Point {
            intersection,
            is_proper: false,
        };
    }

    let pt = proper_intersection(sp, sq).unwrap_or_else(|| {
        let candidates = [p.start, p.end, q.start, q.end];
        candidates[nearest_endpoint(sp, sq)]
    });
    Point {
        intersection: clamp_to_envelope(scale.restore(pt), &envelope_intersection(&p_env, &q_env)),
        is_proper: true,
    }
}

#[inline]
fn orient2d<T: GeoFloat>(p: Coordinate<T>, q: Coordinate<T>, r: Coordinate<T>) -> Orientation {
    <T as HasKernel>::Ker::orient2d(p, q, r)
}

/// Scaling by a power of two that brings the largest coordinate
/// magnitude of a segment pair into `[1, 2)`.
///
/// The kernel predicates are exact only while their intermediate
/// products neither overflow nor underflow; in the scaled frame they
/// don't. Multiplying by a power of two is exact unless the result is
/// subnormal, so orientations are unchanged, and scaled values only
/// lose precision if they are below `2^-1022` of the largest one.
#[derive(Debug, Clone, Copy)]
struct Scale<T> {
    forward: [T; 2],
    backward: [T; 2],
}

impl<T: GeoFloat> Scale<T> {
    fn new(p: &Line<T>, q: &Line<T>) -> Self {
        let max = [p.start, p.end, q.start, q.end]
            .iter()
            .fold(T::zero(), |m, c| m.max(c.x.abs()).max(c.y.abs()));
        let exp = if max > T::zero() {
            max.log2().floor().to_i32().unwrap_or(0)
        } else {
            0
        };
        // Split in two factors: `2^exp` alone may not be representable.
        let (lo, hi) = (exp / 2, exp - exp / 2);
        let two = T::one() + T::one();
        Scale {
            forward: [two.powi(-lo), two.powi(-hi)],
            backward: [two.powi(lo), two.powi(hi)],
        }
    }

    #[inline]
    fn apply(factors: &[T; 2], c: Coordinate<T>) -> Coordinate<T> {
        Coordinate {
            x: c.x * factors[0] * factors[1],
            y: c.y * factors[0] * factors[1],
        }
    }

    fn line(&self, l: Line<T>) -> Line<T> {
        Line::new(
            Self::apply(&self.forward, l.start),
            Self::apply(&self.forward, l.end),
        )
    }

    fn restore(&self, c: Coordinate<T>) -> Coordinate<T> {
        Self::apply(&self.backward, c)
    }
}

/// Orient the line so that `start <= end` lexicographically.
fn canonical<T: GeoFloat>(l: Line<T>) -> Line<T> {
    if LexPoint::from(l.end) < LexPoint::from(l.start) {
        Line::new(l.end, l.start)
    } else {
        l
    }
}

fn canonical_pair<T: GeoFloat>(p: Line<T>, q: Line<T>) -> (Line<T>, Line<T>) {
    let p = canonical(p);
    let q = canonical(q);
    let key = |l: &Line<T>| (LexPoint::from(l.start), LexPoint::from(l.end));
    if key(&q) < key(&p) {
        (q, p)
    } else {
        (p, q)
    }
}

/// A point inside the envelope of a segment meets it iff it is
/// collinear with it.
fn point_on_segment<T: GeoFloat>(
    pt: Coordinate<T>,
    orientation: Orientation,
) -> SegmentIntersection<T> {
    if orientation == Orientation::Collinear {
        SegmentIntersection::Point {
            intersection: pt,
            is_proper: false,
        }
    } else {
        SegmentIntersection::Disjoint
    }
}

/// Overlap of two canonical collinear segments.
fn collinear_intersection<T: GeoFloat>(p: Line<T>, q: Line<T>) -> SegmentIntersection<T> {
    let start = LexPoint::from(p.start).max(LexPoint::from(q.start));
    let end = LexPoint::from(p.end).min(LexPoint::from(q.end));
    if start > end {
        SegmentIntersection::Disjoint
    } else {
        SegmentIntersection::Collinear {
            start: start.coord(),
            end: end.coord(),
        }
    }
}

fn envelope_intersection<T: GeoFloat>(a: &Rect<T>, b: &Rect<T>) -> Rect<T> {
    Rect::new(
        Coordinate {
            x: a.min().x.max(b.min().x),
            y: a.min().y.max(b.min().y),
        },
        Coordinate {
            x: a.max().x.min(b.max().x),
            y: a.max().y.min(b.max().y),
        },
    )
}

/// Locate the crossing of two scaled segments known to cross
/// properly.
///
/// The coordinates are translated so that the centre of the envelope
/// intersection is the origin, which removes the common magnitude of
/// the inputs. The point is evaluated along the shorter segment with
/// the parameter clamped to `[0, 1]`. `None` if the crossing can't be
/// evaluated.
fn proper_intersection<T: GeoFloat>(p: Line<T>, q: Line<T>) -> Option<Coordinate<T>> {
    let env = envelope_intersection(&Rect::new(p.start, p.end), &Rect::new(q.start, q.end));
    let two = T::one() + T::one();
    let mid = Coordinate {
        x: (env.min().x + env.max().x) / two,
        y: (env.min().y + env.max().y) / two,
    };

    let (a, b) = if length2(&p) <= length2(&q) {
        (p, q)
    } else {
        (q, p)
    };
    let a_start = a.start - mid;
    let b_start = b.start - mid;
    let da = (a.end - mid) - a_start;
    let db = (b.end - mid) - b_start;

    let denom = cross(da, db);
    let t = cross(b_start - a_start, db) / denom;
    if denom == T::zero() || !t.is_finite() {
        return None;
    }
    let t = t.max(T::zero()).min(T::one());
    let pt = a_start + da * t + mid;
    (pt.x.is_finite() && pt.y.is_finite()).then(|| clamp_to_envelope(pt, &env))
}

#[inline]
fn cross<T: GeoFloat>(u: Coordinate<T>, v: Coordinate<T>) -> T {
    u.x * v.y - u.y * v.x
}

#[inline]
fn length2<T: GeoFloat>(l: &Line<T>) -> T {
    let d = l.delta();
    d.x * d.x + d.y * d.y
}

fn distance2_to_segment<T: GeoFloat>(pt: Coordinate<T>, seg: Line<T>) -> T {
    let d = seg.delta();
    let len2 = d.x * d.x + d.y * d.y;
    let proj = if len2 == T::zero() {
        seg.start
    } else {
        let v = pt - seg.start;
        let r = ((v.x * d.x + v.y * d.y) / len2).max(T::zero()).min(T::one());
        seg.start + d * r
    };
    let off = pt - proj;
    off.x * off.x + off.y * off.y
}

/// Index into `[p.start, p.end, q.start, q.end]` of the end point
/// closest to the other segment; used when the crossing can't be
/// evaluated. Non-finite distances never win.
fn nearest_endpoint<T: GeoFloat>(p: Line<T>, q: Line<T>) -> usize {
    let distances = [
        distance2_to_segment(p.start, q),
        distance2_to_segment(p.end, q),
        distance2_to_segment(q.start, p),
        distance2_to_segment(q.end, p),
    ];
    let mut best = (0, T::infinity());
    for (idx, &dist) in distances.iter().enumerate() {
        if dist.is_finite() && dist < best.1 {
            best = (idx, dist);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use geo::line_intersection::line_intersection;
    use rand::{thread_rng, Rng};

    use super::*;
    use crate::random::*;

    fn isect(p: [(f64, f64); 2], q: [(f64, f64); 2]) -> SegmentIntersection<f64> {
        segment_intersection(Line::from(p), Line::from(q))
    }

    fn reversed(l: Line<f64>) -> Line<f64> {
        Line::new(l.end, l.start)
    }

    #[test]
    fn test_crossing() {
        let res = isect([(0., 0.), (5., 5.)], [(0., 5.), (5., 0.)]);
        assert_eq!(
            res,
            SegmentIntersection::Point {
                intersection: Coordinate { x: 2.5, y: 2.5 },
                is_proper: true
            }
        );
        assert_eq!(res.classification(), Classification::PointIntersection);
        assert_eq!(res.points().len(), 1);
    }

    #[test]
    fn test_collinear_overlap() {
        let res = isect([(0., 0.), (4., 0.)], [(2., 0.), (6., 0.)]);
        assert_eq!(res.classification(), Classification::CollinearOverlap);
        assert_eq!(
            res.points().as_slice(),
            &[Coordinate { x: 2., y: 0. }, Coordinate { x: 4., y: 0. }]
        );

        // Direction of the inputs doesn't matter.
        let res2 = isect([(6., 0.), (2., 0.)], [(4., 0.), (0., 0.)]);
        assert_eq!(res, res2);

        // Containment
        let res = isect([(0., 0.), (4., 4.)], [(1., 1.), (2., 2.)]);
        assert_eq!(
            res,
            SegmentIntersection::Collinear {
                start: Coordinate { x: 1., y: 1. },
                end: Coordinate { x: 2., y: 2. }
            }
        );
    }

    #[test]
    fn test_collinear_touch() {
        let res = isect([(0., 0.), (2., 0.)], [(3., 0.), (2., 0.)]);
        assert_eq!(res.classification(), Classification::CollinearOverlap);
        assert_eq!(res.num_points(), 1);
        assert_eq!(res.points().as_slice(), &[Coordinate { x: 2., y: 0. }]);

        let res = isect([(0., 0.), (1., 0.)], [(2., 0.), (3., 0.)]);
        assert_eq!(res, SegmentIntersection::Disjoint);
    }

    #[test]
    fn test_touching() {
        let res = isect([(0., 0.), (2., 0.)], [(1., 0.), (1., 1.)]);
        assert_eq!(
            res,
            SegmentIntersection::Point {
                intersection: Coordinate { x: 1., y: 0. },
                is_proper: false
            }
        );

        let res = isect([(0., 0.), (1., 1.)], [(1., 1.), (2., 0.)]);
        assert_eq!(
            res,
            SegmentIntersection::Point {
                intersection: Coordinate { x: 1., y: 1. },
                is_proper: false
            }
        );
    }

    #[test]
    fn test_disjoint() {
        assert!(!isect([(0., 0.), (1., 0.)], [(0., 1.), (1., 1.)]).has_intersection());
        assert!(!isect([(0., 0.), (2., 2.)], [(2., 0.), (1.5, 0.5)]).has_intersection());
        assert_eq!(
            isect([(0., 0.), (2., 2.)], [(2., 0.), (1.5, 0.5)]).classification(),
            Classification::NoIntersection
        );
    }

    #[test]
    fn test_degenerate() {
        let res = isect([(1., 1.), (1., 1.)], [(0., 0.), (2., 2.)]);
        assert_eq!(
            res,
            SegmentIntersection::Point {
                intersection: Coordinate { x: 1., y: 1. },
                is_proper: false
            }
        );
        assert_eq!(res, isect([(0., 0.), (2., 2.)], [(1., 1.), (1., 1.)]));

        assert!(!isect([(1., 1.5), (1., 1.5)], [(0., 0.), (2., 2.)]).has_intersection());
        assert!(isect([(1., 1.), (1., 1.)], [(1., 1.), (1., 1.)]).has_intersection());
        assert!(!isect([(1., 1.), (1., 1.)], [(1., 2.), (1., 2.)]).has_intersection());
    }

    #[test]
    fn test_near_parallel() {
        let p: Line<f64> = Line::from([(0., 0.), (10., 1.)]);
        let q: Line<f64> = Line::from([(0., 1e-15), (10., 1. - 1e-15)]);
        let res = segment_intersection(p, q);
        let pt = match res {
            SegmentIntersection::Point { intersection, .. } => intersection,
            _ => panic!("expected a point intersection, got {:?}", res),
        };
        assert!(distance2_to_segment(pt, p).sqrt() < 1e-9);
        assert!(distance2_to_segment(pt, q).sqrt() < 1e-9);
        // The location along the lines is ill-conditioned, but it must
        // stay on both segments.
        assert!((0. ..=10.).contains(&pt.x));
    }

    #[test]
    fn test_large_magnitude() {
        let res = isect(
            [(1e9, 1e9), (1e9 + 2., 1e9 + 2.)],
            [(1e9, 1e9 + 2.), (1e9 + 2., 1e9)],
        );
        assert_eq!(res.points().as_slice(), &[Coordinate { x: 1e9 + 1., y: 1e9 + 1. }]);
    }

    #[test]
    fn test_extreme_magnitudes() {
        for &s in [1e160, 1e300, f64::MAX / 4.].iter() {
            let res = isect([(-s, -s), (s, s)], [(-s, s), (s, -s)]);
            assert_eq!(
                res,
                SegmentIntersection::Point {
                    intersection: Coordinate { x: 0., y: 0. },
                    is_proper: true
                }
            );
        }

        let s = 1e-300;
        let res = isect([(0., 0.), (s, s)], [(0., s), (s, 0.)]);
        assert_eq!(
            res,
            SegmentIntersection::Point {
                intersection: Coordinate { x: s / 2., y: s / 2. },
                is_proper: true
            }
        );

        // Subnormal coordinates.
        let s = 4. * f64::from_bits(1);
        let res = isect([(0., 0.), (s, s)], [(0., s), (s, 0.)]);
        assert_eq!(res.classification(), Classification::PointIntersection);
        assert_eq!(
            isect([(0., 0.), (s, 0.)], [(s / 2., 0.), (2. * s, 0.)]).classification(),
            Classification::CollinearOverlap
        );

        let res = isect([(1e200, 0.), (1e200, 1e200)], [(0., 1e200), (2e200, 1e200)]);
        assert_eq!(
            res,
            SegmentIntersection::Point {
                intersection: Coordinate { x: 1e200, y: 1e200 },
                is_proper: false
            }
        );
    }

    #[test]
    fn test_scale_invariance_random() {
        let mut rng = thread_rng();
        let bbox = Rect::new([0., 0.], [1., 1.]);
        let scaled = |l: Line<f64>, f: f64| Line::new(l.start * f, l.end * f);
        for _ in 0..1000 {
            let (p, q) = if rng.gen_bool(0.5) {
                (uniform_line(&mut rng, bbox), uniform_line(&mut rng, bbox))
            } else {
                (grid_line(&mut rng, 4), grid_line(&mut rng, 4))
            };
            let res = segment_intersection(p, q);
            for &exp in [600, -900].iter() {
                let f = 2f64.powi(exp);
                let res_scaled = segment_intersection(scaled(p, f), scaled(q, f));
                assert_eq!(res.classification(), res_scaled.classification());
                let expected: Vec<_> = res.points().iter().map(|&c| c * f).collect();
                assert_eq!(res_scaled.points().to_vec(), expected);
            }
        }
    }

    #[test]
    fn test_nearest_endpoint_ignores_non_finite() {
        let p: Line<f64> = Line::from([(0., 0.), (1., 0.)]);
        let q: Line<f64> = Line::from([(f64::MAX, f64::MAX), (1., 1e-3)]);
        // Distances from `p` overflow; the end point of `q` is picked.
        assert_eq!(nearest_endpoint(p, q), 3);
    }

    #[test]
    fn test_symmetry_random() {
        let mut rng = thread_rng();
        let bbox = Rect::new([0., 0.], [1., 1.]);
        for _ in 0..1000 {
            let (p, q) = if rng.gen_bool(0.5) {
                (uniform_line(&mut rng, bbox), uniform_line(&mut rng, bbox))
            } else {
                (grid_line(&mut rng, 4), grid_line(&mut rng, 4))
            };
            let res = segment_intersection(p, q);
            assert_eq!(res, segment_intersection(q, p));
            assert_eq!(res, segment_intersection(reversed(p), q));
            assert_eq!(res, segment_intersection(q, reversed(p)));
            assert_eq!(res, segment_intersection(reversed(q), reversed(p)));
        }
    }

    #[test]
    fn test_within_envelopes_random() {
        let mut rng = thread_rng();
        let bbox = Rect::new([0., 0.], [1024., 1024.]);
        for _ in 0..1000 {
            let p = uniform_line(&mut rng, bbox);
            let q = uniform_line(&mut rng, bbox);
            for pt in segment_intersection(p, q).points() {
                for l in [p, q].iter() {
                    let env = Rect::new(l.start, l.end);
                    assert!(env.min().x <= pt.x && pt.x <= env.max().x);
                    assert!(env.min().y <= pt.y && pt.y <= env.max().y);
                    assert!(distance2_to_segment(pt, *l).sqrt() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_agrees_with_geo_on_grid() {
        let mut rng = thread_rng();
        for _ in 0..1000 {
            let p = grid_line(&mut rng, 5);
            let q = grid_line(&mut rng, 5);
            if p.start == p.end || q.start == q.end {
                continue;
            }
            assert_eq!(
                segment_intersection(p, q).has_intersection(),
                line_intersection(p, q).is_some(),
                "disagreement on {:?} x {:?}",
                p,
                q
            );
        }
    }
}
