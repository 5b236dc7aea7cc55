//! Error types for the service layer

use kmeans::KmeansError;
use thiserror::Error;

pub type VizResult<T> = Result<T, VizError>;

#[derive(Error, Debug)]
pub enum VizError {
    /// Rejected by the clustering engine.
    #[error(transparent)]
    Kmeans(#[from] KmeansError),

    /// Request could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plot rendering failed: {0}")]
    Plot(String),

    /// A blocking worker panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Task(String),
}

impl VizError {
    /// Stable machine-readable name reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            VizError::Kmeans(err) => err.kind(),
            VizError::BadRequest(_) | VizError::Json(_) => "bad_request",
            VizError::Io(_) | VizError::Plot(_) | VizError::Task(_) => "internal",
        }
    }
}
