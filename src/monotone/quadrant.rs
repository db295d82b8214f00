use geo::{Coordinate, GeoFloat};

/// The quadrant a direction vector points into.
///
/// Axis-aligned directions belong to the quadrant counter-clockwise
/// after them when pointing along `+x` or `+y`, i.e. `(1, 0)` and
/// `(0, 1)` are both `NE`, `(-1, 0)` is `NW` and `(0, -1)` is `SE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NE,
    NW,
    SW,
    SE,
}

impl Quadrant {
    /// Quadrant of the direction `(dx, dy)`; `None` for the zero
    /// vector.
    pub fn of_delta<T: GeoFloat>(dx: T, dy: T) -> Option<Self> {
        let zero = T::zero();
        if dx == zero && dy == zero {
            return None;
        }
        Some(match (dx >= zero, dy >= zero) {
            (true, true) => Quadrant::NE,
            (false, true) => Quadrant::NW,
            (false, false) => Quadrant::SW,
            (true, false) => Quadrant::SE,
        })
    }

    /// Quadrant of the direction from `p` to `q`; `None` if they
    /// are equal.
    #[inline]
    pub fn of<T: GeoFloat>(p: Coordinate<T>, q: Coordinate<T>) -> Option<Self> {
        Self::of_delta(q.x - p.x, q.y - p.y)
    }
}
