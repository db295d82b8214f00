use geo::{Coordinate, GeoFloat, Rect};

/// Inclusive overlap test of two envelopes; touching boxes overlap.
#[inline]
pub fn envelopes_overlap<T: GeoFloat>(a: &Rect<T>, b: &Rect<T>) -> bool {
    a.min().x <= b.max().x
        && b.min().x <= a.max().x
        && a.min().y <= b.max().y
        && b.min().y <= a.max().y
}

/// Clamp `pt` component-wise into the envelope `rect`.
#[inline]
pub fn clamp_to_envelope<T: GeoFloat>(pt: Coordinate<T>, rect: &Rect<T>) -> Coordinate<T> {
    Coordinate {
        x: pt.x.max(rect.min().x).min(rect.max().x),
        y: pt.y.max(rect.min().y).min(rect.max().y),
    }
}
