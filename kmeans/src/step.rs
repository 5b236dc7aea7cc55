//! Assignment-update step of Lloyd's algorithm
//! Assigns every point to its nearest centroid, then moves each centroid to
//! the arithmetic mean of the points assigned to it

use serde::{Deserialize, Serialize};

use crate::{tools::nearest_centroid, types::{EuclideanDistance, KmeansValue, Point}};

/// Result of one assignment-update step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Centroids after the update, same order as the input centroids
    pub centroids: Vec<Point>,
    /// Label of every point, computed against the input centroids
    pub labels: Vec<usize>,
}

/// Run one assignment-update step.
///
/// The input centroids are not modified; a new centroid set is returned.
pub fn step(points: &[Point], centroids: &[Point]) -> StepOutcome {
    let labels = assign_points(points, centroids);
    let centroids = euclidean_recalculate(points, centroids, &labels);
    StepOutcome { centroids, labels }
}

/// Label every point with the index of its nearest centroid (ties: lowest index)
pub fn assign_points(points: &[Point], centroids: &[Point]) -> Vec<usize> {
    points.iter()
        .map(|point| nearest_centroid(point, centroids).0)
        .collect()
}

/// Recalculate cluster centroids using the Euclidean mean
///
/// # Arguments
/// * `points` - All data points
/// * `centroids` - Centroids the labels were computed against
/// * `labels` - Cluster index of every point
///
/// # Empty clusters
/// A centroid that received no points keeps its previous position.
pub fn euclidean_recalculate(points: &[Point], centroids: &[Point], labels: &[usize]) -> Vec<Point> {
    let dim = centroids.first().map(|c| c.len()).unwrap_or(0);
    let mut sums: Vec<Point> = vec![Point::zero(dim); centroids.len()];
    let mut counts: Vec<usize> = vec![0; centroids.len()];

    for (point, label) in points.iter().zip(labels.iter()) {
        sums[*label].add_by_field(point);
        counts[*label] += 1;
    }

    sums.iter()
        .zip(counts.iter())
        .zip(centroids.iter())
        .map(|((sum, count), previous)| {
            if *count > 0 {
                sum.div_by_n(*count)
            } else {
                previous.clone()
            }
        })
        .collect()
}

/// Sum of squared distances from points to their labelled centroid
pub fn inertia(points: &[Point], centroids: &[Point], labels: &[usize]) -> f64 {
    points.iter()
        .zip(labels.iter())
        .map(|(point, label)| point.squared_distance(&centroids[*label]))
        .sum()
}

/// Sum of squared distances from points to their nearest centroid
pub fn nearest_inertia(points: &[Point], centroids: &[Point]) -> f64 {
    points.iter()
        .map(|point| nearest_centroid(point, centroids).1)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_centroids_to_cluster_means() {
        let points = vec![vec![0.0, 0.0], vec![2.0, 0.0], vec![10.0, 10.0], vec![12.0, 10.0]];
        let start = vec![vec![1.0, 1.0], vec![9.0, 9.0]];
        let out = step(&points, &start);
        assert_eq!(out.labels, vec![0, 0, 1, 1]);
        assert_eq!(out.centroids, vec![vec![1.0, 0.0], vec![11.0, 10.0]]);
        // input untouched
        assert_eq!(start, vec![vec![1.0, 1.0], vec![9.0, 9.0]]);
    }

    #[test]
    fn empty_cluster_holds_position() {
        let points = vec![vec![0.0], vec![1.0]];
        let start = vec![vec![0.5], vec![100.0]];
        let out = step(&points, &start);
        assert_eq!(out.labels, vec![0, 0]);
        assert_eq!(out.centroids, vec![vec![0.5], vec![100.0]]);
    }

    #[test]
    fn equidistant_point_goes_to_first_centroid() {
        let points = vec![vec![0.0]];
        let start = vec![vec![-1.0], vec![1.0]];
        assert_eq!(step(&points, &start).labels, vec![0]);
    }

    #[test]
    fn inertia_does_not_grow() {
        let points: Vec<Point> = (0..40)
            .map(|i| vec![(i * 37 % 100) as f64, (i * 53 % 100) as f64])
            .collect();
        let mut centroids = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0]];
        for _ in 0..10 {
            let before = nearest_inertia(&points, &centroids);
            let out = step(&points, &centroids);
            let after = inertia(&points, &out.centroids, &out.labels);
            assert!(after <= before + 1e-9);
            centroids = out.centroids;
        }
    }
}
