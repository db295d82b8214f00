#![allow(dead_code)]

use std::f64::consts::PI;

use geo::{rotate::RotatePoint, Coordinate, Line, Rect};

use rand::Rng;
use rand_distr::{Normal, Standard};

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

#[inline]
pub fn uniform_line<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Line<f64> {
    Line::new(uniform_point(rng, bounds), uniform_point(rng, bounds))
}

#[inline]
pub fn uniform_line_with_length<R: Rng>(rng: &mut R, bounds: Rect<f64>, length: f64) -> Line<f64> {
    let start = uniform_point(rng, bounds);
    let line = Line::new(start, start + (length, 0.).into());
    let angle = rng.sample::<f64, _>(Standard) * 2. * PI;
    line.rotate_around_point(angle, start.into())
}

/// A line with integer end points in `[0, n]²`. Such lines often
/// share end points, overlap or are degenerate.
#[inline]
pub fn grid_line<R: Rng>(rng: &mut R, n: u32) -> Line<f64> {
    let mut pt = || Coordinate {
        x: rng.gen_range(0..=n) as f64,
        y: rng.gen_range(0..=n) as f64,
    };
    Line::new(pt(), pt())
}

/// `n` coordinates of a random walk from the origin with normally
/// distributed steps of deviation `step`.
pub fn random_walk<R: Rng>(rng: &mut R, n: usize, step: f64) -> Vec<Coordinate<f64>> {
    let normal = Normal::new(0., step).unwrap();
    let mut curr = Coordinate { x: 0., y: 0. };
    let mut coords = Vec::with_capacity(n);
    coords.push(curr);
    while coords.len() < n {
        curr = curr + (rng.sample(normal), rng.sample(normal)).into();
        coords.push(curr);
    }
    coords
}

/// `n` coordinates of a walk on the integer grid. Each step moves by
/// `-1`, `0` or `1` along each axis, so the walk revisits vertices,
/// backtracks and repeats coordinates.
pub fn grid_walk<R: Rng>(rng: &mut R, n: usize) -> Vec<Coordinate<f64>> {
    let mut curr = Coordinate { x: 0., y: 0. };
    let mut coords = Vec::with_capacity(n);
    coords.push(curr);
    while coords.len() < n {
        curr.x += rng.gen_range(-1..=1) as f64;
        curr.y += rng.gen_range(-1..=1) as f64;
        coords.push(curr);
    }
    coords
}
