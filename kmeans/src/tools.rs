//! Input validation and nearest-centroid helpers shared by the initializer,
//! the assignment step and the driver

use crate::{error::{KmeansError, KmeansResult}, types::{EuclideanDistance, Point}};

/// Check that the point set is non-empty, rectangular and finite.
///
/// # Returns
/// * The common dimension of every point
pub fn validate_points(points: &[Point]) -> KmeansResult<usize> {
    let first = points.first()
        .ok_or_else(|| KmeansError::MalformedInput("point set is empty".to_string()))?;
    let dim = first.len();
    if dim == 0 {
        return Err(KmeansError::MalformedInput("points must have at least one coordinate".to_string()));
    }
    for (idx, point) in points.iter().enumerate() {
        if point.len() != dim {
            return Err(KmeansError::MalformedInput(format!(
                "point {} has {} coordinates, expected {}", idx, point.len(), dim
            )));
        }
        if point.iter().any(|x| !x.is_finite()) {
            return Err(KmeansError::MalformedInput(format!("point {} has a non-finite coordinate", idx)));
        }
    }
    Ok(dim)
}

/// Check `1 <= n_clusters <= points`.
pub fn validate_n_clusters(n_clusters: usize, n_points: usize) -> KmeansResult<()> {
    if n_clusters == 0 || n_clusters > n_points {
        return Err(KmeansError::invalid(
            "n_clusters",
            format!("a value in 1..={}", n_points),
            n_clusters,
        ));
    }
    Ok(())
}

/// True when `centroids` has exactly `n_clusters` finite entries of dimension `dim`.
pub fn centroids_fit(centroids: &[Point], n_clusters: usize, dim: usize) -> bool {
    centroids.len() == n_clusters
        && centroids.iter().all(|c| c.len() == dim && c.iter().all(|x| x.is_finite()))
}

/// Index and squared distance of the centroid nearest to `point`.
/// Scans centroids in order and keeps the first minimizer, so ties go to the lowest index.
pub fn nearest_centroid(point: &[f64], centroids: &[Point]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = point.squared_distance(centroid.as_slice());
        if dist < best.1 {
            best = (idx, dist);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_ragged_sets() {
        assert!(matches!(validate_points(&[]), Err(KmeansError::MalformedInput(_))));
        assert!(matches!(validate_points(&[vec![]]), Err(KmeansError::MalformedInput(_))));
        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(validate_points(&ragged), Err(KmeansError::MalformedInput(_))));
        let nan = vec![vec![1.0, f64::NAN]];
        assert!(matches!(validate_points(&nan), Err(KmeansError::MalformedInput(_))));
        assert_eq!(validate_points(&[vec![1.0, 2.0], vec![3.0, 4.0]]), Ok(2));
    }

    #[test]
    fn cluster_count_bounds() {
        assert!(validate_n_clusters(0, 5).is_err());
        assert!(validate_n_clusters(6, 5).is_err());
        assert!(validate_n_clusters(5, 5).is_ok());
        match validate_n_clusters(9, 4) {
            Err(KmeansError::InvalidParameter { parameter, .. }) => assert_eq!(parameter, "n_clusters"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let centroids = vec![vec![-1.0, 0.0], vec![1.0, 0.0]];
        assert_eq!(nearest_centroid(&[0.0, 0.0], &centroids).0, 0);
        assert_eq!(nearest_centroid(&[0.5, 0.0], &centroids).0, 1);
    }
}
