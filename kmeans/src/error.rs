//! Error types for the K-Means engine

use thiserror::Error;

/// Result type alias for engine operations.
pub type KmeansResult<T> = Result<T, KmeansError>;

/// Failures surfaced to the caller. Permissive fallbacks (unknown init method,
/// malformed previous centroids) never produce one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KmeansError {
    /// A run parameter violates its constraint.
    #[error("invalid parameter `{parameter}`: expected {constraint}, got {actual}")]
    InvalidParameter {
        parameter: &'static str,
        constraint: String,
        actual: String,
    },

    /// The point set itself cannot be clustered.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Not enough points to pick distinct starting centroids.
    ///
    /// Returned by the `init` functions. `KmeansDriver` checks `n_clusters`
    /// against the point count first and reports an oversized value as
    /// `InvalidParameter { parameter: "n_clusters", .. }` instead.
    #[error("insufficient data: need {required} distinct points, got {available}")]
    InsufficientData { required: usize, available: usize },
}

impl KmeansError {
    pub fn invalid(parameter: &'static str, constraint: impl Into<String>, actual: impl ToString) -> Self {
        KmeansError::InvalidParameter {
            parameter,
            constraint: constraint.into(),
            actual: actual.to_string(),
        }
    }

    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            KmeansError::InvalidParameter { .. } => "invalid_parameter",
            KmeansError::MalformedInput(_) => "malformed_input",
            KmeansError::InsufficientData { .. } => "insufficient_data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_parameter() {
        let err = KmeansError::invalid("n_clusters", "1..=4", 7);
        assert_eq!(err.kind(), "invalid_parameter");
        assert_eq!(err.to_string(), "invalid parameter `n_clusters`: expected 1..=4, got 7");
    }
}
