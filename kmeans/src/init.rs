//! Centroid initialization strategies
//! Implements random sampling, farthest-first traversal and K-Means++ seeding.
//! Every strategy picks whole points from the data set by index, so the chosen
//! centroids are always distinct rows even when their values coincide.

use rand::RngExt;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::{
    error::{KmeansError, KmeansResult},
    tools::validate_points,
    types::{EuclideanDistance, InitMethod, Point},
};

/// Produce the starting centroid set for `method`
///
/// # Arguments
/// * `points` - Data set to pick centroids from
/// * `n_clusters` - Number of centroids to produce
/// * `method` - Strategy selector
/// * `rng` - Seeded random source shared with the caller
///
/// # Returns
/// * `Ok(Some(centroids))` with exactly `n_clusters` entries
/// * `Ok(None)` for `InitMethod::Manual`: the caller provides centroids
pub fn initialize(
    points: &[Point],
    n_clusters: usize,
    method: InitMethod,
    rng: &mut ChaCha20Rng,
) -> KmeansResult<Option<Vec<Point>>> {
    if method == InitMethod::Manual {
        return Ok(None);
    }
    generate_centroids(points, n_clusters, method, rng).map(Some)
}

/// Generate `n_clusters` centroids from the data with `method`.
///
/// `InitMethod::Manual` has nothing to generate from and is treated as `Random`.
pub fn generate_centroids(
    points: &[Point],
    n_clusters: usize,
    method: InitMethod,
    rng: &mut ChaCha20Rng,
) -> KmeansResult<Vec<Point>> {
    check_pickable(points, n_clusters)?;

    let indices = match method {
        InitMethod::Random | InitMethod::Manual => random_indices(points.len(), n_clusters, rng),
        InitMethod::Farthest => {
            let first = rng.random_range(0..points.len());
            farthest_first_indices(points, n_clusters, first)
        }
        InitMethod::PlusPlus => plusplus_indices(points, n_clusters, rng),
    };
    debug!(method = %method, ?indices, "initialized centroids");

    Ok(indices.into_iter().map(|idx| points[idx].clone()).collect())
}

/// Farthest-first traversal from a fixed first pick.
///
/// Deterministic for a given `first` index and point order.
pub fn farthest_first(points: &[Point], n_clusters: usize, first: usize) -> KmeansResult<Vec<Point>> {
    check_pickable(points, n_clusters)?;
    if first >= points.len() {
        return Err(KmeansError::invalid("first", format!("an index below {}", points.len()), first));
    }
    Ok(farthest_first_indices(points, n_clusters, first)
        .into_iter()
        .map(|idx| points[idx].clone())
        .collect())
}

fn check_pickable(points: &[Point], n_clusters: usize) -> KmeansResult<()> {
    validate_points(points)?;
    if n_clusters == 0 {
        return Err(KmeansError::invalid("n_clusters", "a positive integer", n_clusters));
    }
    if n_clusters > points.len() {
        return Err(KmeansError::InsufficientData { required: n_clusters, available: points.len() });
    }
    Ok(())
}

/// Sample `k` distinct indices out of `0..n` (partial Fisher-Yates)
fn random_indices(n: usize, k: usize, rng: &mut ChaCha20Rng) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.random_range(i..n);
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

fn farthest_first_indices(points: &[Point], k: usize, first: usize) -> Vec<usize> {
    let mut chosen = vec![false; points.len()];
    let mut selected = Vec::with_capacity(k);
    chosen[first] = true;
    selected.push(first);

    // Minimum distance from every point to the centroids chosen so far
    let mut min_dist: Vec<f64> = points.iter()
        .map(|p| p.squared_distance(&points[first]))
        .collect();

    while selected.len() < k {
        let mut best: Option<(usize, f64)> = None;
        for (idx, dist) in min_dist.iter().enumerate() {
            if chosen[idx] {
                continue;
            }
            if best.is_none_or(|(_, best_dist)| *dist > best_dist) {
                best = Some((idx, *dist));
            }
        }
        let Some((next, _)) = best else { break };
        chosen[next] = true;
        selected.push(next);
        update_min_distances(points, &mut min_dist, next);
    }
    selected
}

/// K-Means++ seeding
///
/// 1. Choose the first centroid uniformly at random
/// 2. For each remaining centroid, weight every point by its squared distance
///    to the nearest chosen centroid and draw one point with that probability
/// 3. When all remaining weights are zero (duplicated data) or their sum is not
///    finite, draw uniformly among the points not chosen yet
fn plusplus_indices(points: &[Point], k: usize, rng: &mut ChaCha20Rng) -> Vec<usize> {
    let first = rng.random_range(0..points.len());
    let mut chosen = vec![false; points.len()];
    let mut selected = Vec::with_capacity(k);
    chosen[first] = true;
    selected.push(first);

    let mut min_dist: Vec<f64> = points.iter()
        .map(|p| p.squared_distance(&points[first]))
        .collect();

    while selected.len() < k {
        let total: f64 = min_dist.iter().enumerate()
            .filter(|(idx, _)| !chosen[*idx])
            .map(|(_, d)| *d)
            .sum();

        // Huge finite coordinates can overflow the weights to infinity
        let next = if total.is_finite() && total > 0.0 {
            // Weighted draw using cumulative distances
            let rand_val: f64 = rng.random_range(0.0..total);
            let mut cumulative = 0.0;
            let mut picked = None;
            let mut last_positive = None;
            for (idx, dist) in min_dist.iter().enumerate() {
                if chosen[idx] || *dist <= 0.0 {
                    continue;
                }
                cumulative += dist;
                last_positive = Some(idx);
                if rand_val < cumulative {
                    picked = Some(idx);
                    break;
                }
            }
            // Rounding can leave rand_val just above the final cumulative sum
            picked.or(last_positive)
        } else {
            None
        };

        let next = match next {
            Some(idx) => idx,
            None => {
                let remaining: Vec<usize> = (0..points.len()).filter(|idx| !chosen[*idx]).collect();
                remaining[rng.random_range(0..remaining.len())]
            }
        };

        chosen[next] = true;
        selected.push(next);
        update_min_distances(points, &mut min_dist, next);
    }
    selected
}

fn update_min_distances(points: &[Point], min_dist: &mut [f64], added: usize) {
    let centroid = &points[added];
    min_dist.iter_mut().zip(points.iter()).for_each(|(dist, point)| {
        let d = point.squared_distance(centroid);
        if d < *dist {
            *dist = d;
        }
    });
}
