//! Type definitions and trait implementations for K-Means clustering
//! Includes the point representation, the initialization strategy selector
//! and the vector helpers used by assignment and centroid updates

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single observation or centroid: one coordinate per dimension
pub type Point = Vec<f64>;

/// Centroid initialization strategies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitMethod {
    /// Distinct points sampled uniformly without replacement
    #[default]
    Random,
    /// Greedy max-min distance selection after a random first pick
    Farthest,
    /// Sampling proportional to squared distance to the nearest chosen centroid
    PlusPlus,
    /// Centroids are supplied by the caller
    Manual,
}

impl InitMethod {
    /// Resolve a wire name. Matching is case-sensitive and anything
    /// unrecognized resolves to `Random`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "random" => InitMethod::Random,
            "farthest" | "farthest-first" => InitMethod::Farthest,
            "kmeans++" | "k-means++" => InitMethod::PlusPlus,
            "manual" => InitMethod::Manual,
            _ => InitMethod::Random,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InitMethod::Random => "random",
            InitMethod::Farthest => "farthest",
            InitMethod::PlusPlus => "kmeans++",
            InitMethod::Manual => "manual",
        }
    }
}

impl fmt::Display for InitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for calculating Euclidean distance between points
pub trait EuclideanDistance {
    /// Calculate sum((a[i] - b[i])^2) for all paired coordinates
    fn squared_distance(&self, right: &Self) -> f64;
    /// Calculate sqrt(sum((a[i] - b[i])^2)) for all paired coordinates
    fn euclidean_distance(&self, right: &Self) -> f64 {
        self.squared_distance(right).sqrt()
    }
}

impl EuclideanDistance for [f64] {
    fn squared_distance(&self, right: &Self) -> f64 {
        self.iter()
            .zip(right.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
    }
}

impl EuclideanDistance for Vec<f64> {
    fn squared_distance(&self, right: &Self) -> f64 {
        self.as_slice().squared_distance(right.as_slice())
    }
}

/// Operations required for centroid mean calculations
pub trait KmeansValue {
    /// Create an all-zero value of the given dimension
    fn zero(dim: usize) -> Self;
    /// Element-wise in-place addition
    fn add_by_field(&mut self, right: &[f64]);
    /// Divide all elements by a scalar count (for averaging)
    fn div_by_n(&self, div: usize) -> Self;
}

impl KmeansValue for Vec<f64> {
    fn zero(dim: usize) -> Self {
        vec![0.0; dim]
    }
    fn add_by_field(&mut self, right: &[f64]) {
        self.iter_mut().zip(right.iter()).for_each(|(a, b)| *a += *b);
    }
    fn div_by_n(&self, div: usize) -> Self {
        self.iter().map(|a| *a / div as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_method_names_fall_back_to_random() {
        assert_eq!(InitMethod::from_name("bogus"), InitMethod::Random);
        assert_eq!(InitMethod::from_name("KMEANS++"), InitMethod::Random);
        assert_eq!(InitMethod::from_name(""), InitMethod::Random);
        assert_eq!(InitMethod::from_name("kmeans++"), InitMethod::PlusPlus);
        assert_eq!(InitMethod::from_name("farthest"), InitMethod::Farthest);
        assert_eq!(InitMethod::from_name("manual"), InitMethod::Manual);
    }

    #[test]
    fn distances() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        assert_eq!(a.squared_distance(&b), 25.0);
        assert_eq!(a.euclidean_distance(&b), 5.0);
    }

    #[test]
    fn mean_helpers() {
        let mut acc = Vec::<f64>::zero(2);
        acc.add_by_field(&[1.0, 2.0]);
        acc.add_by_field(&[3.0, 6.0]);
        assert_eq!(acc.div_by_n(2), vec![2.0, 4.0]);
    }
}
