#![allow(dead_code)]

use kmeans::Point;
use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// `n` points drawn uniformly from `[lo, hi)` in each of `dim` dimensions.
pub fn uniform_points(n: usize, dim: usize, lo: f64, hi: f64, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..n).map(|_| (0..dim).map(|_| rng.random_range(lo..hi)).collect()).collect()
}

/// Two groups of six points around (1.5, 1.5) and (8.5, 8.5).
pub fn two_groups() -> Vec<Point> {
    let offsets = [(-0.5, -0.5), (0.5, -0.5), (-0.5, 0.5), (0.5, 0.5), (0.0, -0.5), (0.0, 0.5)];
    let mut points: Vec<Point> = offsets.iter().map(|(dx, dy)| vec![1.5 + dx, 1.5 + dy]).collect();
    points.extend(offsets.iter().map(|(dx, dy)| vec![8.5 + dx, 8.5 + dy]));
    points
}

pub fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tol)
}
