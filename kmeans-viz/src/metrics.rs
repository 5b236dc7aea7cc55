//! Metrics calculation for cluster quality assessment
//! Provides per-cluster size and cohesion summaries reported with a full run

use kmeans::{Point, types::EuclideanDistance};
use serde::{Deserialize, Serialize};

/// Size and cohesion of one cluster
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub id: usize,
    /// Number of points labelled with this cluster
    pub size: usize,
    /// Average Euclidean distance of the cluster's points to its centroid
    /// (lower is more cohesive, 0.0 for an empty cluster)
    pub score: f64,
}

/// Calculate cluster quality metrics by measuring distances from points to centroids
///
/// # Arguments
/// * `points` - All data points
/// * `centroids` - Final centroid set, index = cluster id
/// * `labels` - Cluster id of every point
///
/// # Returns
/// * One summary per centroid, in centroid order
pub fn cluster_summaries(points: &[Point], centroids: &[Point], labels: &[usize]) -> Vec<ClusterSummary> {
    let mut sizes = vec![0usize; centroids.len()];
    let mut distance_sums = vec![0.0f64; centroids.len()];

    for (point, label) in points.iter().zip(labels.iter()) {
        sizes[*label] += 1;
        distance_sums[*label] += point.euclidean_distance(&centroids[*label]);
    }

    sizes.iter()
        .zip(distance_sums.iter())
        .enumerate()
        .map(|(id, (size, sum))| ClusterSummary {
            id,
            size: *size,
            score: if *size > 0 { sum / *size as f64 } else { 0.0 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summaries_follow_centroid_order() {
        let points = vec![vec![0.0, 0.0], vec![0.0, 2.0], vec![10.0, 0.0]];
        let centroids = vec![vec![0.0, 1.0], vec![10.0, 0.0], vec![50.0, 50.0]];
        let labels = vec![0, 0, 1];
        let summaries = cluster_summaries(&points, &centroids, &labels);
        assert_eq!(summaries, vec![
            ClusterSummary { id: 0, size: 2, score: 1.0 },
            ClusterSummary { id: 1, size: 1, score: 0.0 },
            ClusterSummary { id: 2, size: 0, score: 0.0 },
        ]);
    }
}
