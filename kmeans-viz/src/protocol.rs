//! Wire protocol: one JSON object per line, tagged by `op`.
//!
//! Field names follow the browser client: `data`, `n_clusters`, `init_method`,
//! `current_iter`, `prev_centers`, `centroids`. The client posts form values,
//! so integer fields also accept numeric strings.

use kmeans::{InitMethod, KmeansError, KmeansResult, Point};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::VizError, metrics::ClusterSummary};

/// Integer sent either as a JSON number or as a numeric string
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireInt(pub i64);

impl<'de> Deserialize<'de> for WireInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(i64),
            Float(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Int(v) => Ok(WireInt(v)),
            Repr::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(WireInt(v as i64)),
            Repr::Float(v) => Err(serde::de::Error::custom(format!("expected an integer, got {}", v))),
            Repr::Text(s) => s.trim()
                .parse::<i64>()
                .map(WireInt)
                .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {:?}", s))),
        }
    }
}

impl WireInt {
    /// Value as a strictly positive count.
    pub fn positive(self, parameter: &'static str) -> KmeansResult<usize> {
        if self.0 <= 0 {
            return Err(KmeansError::invalid(parameter, "a positive integer", self.0));
        }
        Ok(self.0 as usize)
    }
}

/// Raw point list; coordinates are checked when converted so that a
/// non-numeric value is reported as malformed input rather than a decode error
#[derive(Clone, Debug, Deserialize)]
#[serde(transparent)]
pub struct WirePoints(pub Vec<Vec<Value>>);

impl WirePoints {
    pub fn to_points(&self, field: &str) -> KmeansResult<Vec<Point>> {
        self.0.iter().enumerate()
            .map(|(row, coords)| {
                coords.iter().enumerate()
                    .map(|(col, value)| {
                        value.as_f64().ok_or_else(|| KmeansError::MalformedInput(format!(
                            "{}[{}][{}] is not a number: {}", field, row, col, value
                        )))
                    })
                    .collect::<KmeansResult<Point>>()
            })
            .collect()
    }
}

/// Optional centroid payload. `null`, `[]` and anything that is not a list of
/// numeric rows count as absent.
pub fn optional_centroids(value: &Option<Value>) -> Option<Vec<Point>> {
    let rows = value.as_ref()?.as_array()?;
    if rows.is_empty() {
        return None;
    }
    rows.iter()
        .map(|row| row.as_array()?.iter().map(Value::as_f64).collect::<Option<Point>>())
        .collect()
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    InitializeCentroids(InitializeRequest),
    GenerateDataset(GenerateRequest),
    RunKmeansStep(StepRequest),
    RunKmeans(RunRequest),
    ResetKmeans(ResetRequest),
}

impl Request {
    pub fn op(&self) -> &'static str {
        match self {
            Request::InitializeCentroids(_) => "initialize_centroids",
            Request::GenerateDataset(_) => "generate_dataset",
            Request::RunKmeansStep(_) => "run_kmeans_step",
            Request::RunKmeans(_) => "run_kmeans",
            Request::ResetKmeans(_) => "reset_kmeans",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct InitializeRequest {
    pub data: WirePoints,
    pub n_clusters: WireInt,
    #[serde(default)]
    pub init_method: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub n_points: Option<WireInt>,
    /// `uniform` (default) or `blobs`
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub n_blobs: Option<WireInt>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StepRequest {
    pub data: WirePoints,
    pub n_clusters: WireInt,
    #[serde(default)]
    pub init_method: String,
    /// Defaults to the session's next iteration, or 1 without a session
    #[serde(default)]
    pub current_iter: Option<WireInt>,
    #[serde(default)]
    pub prev_centers: Option<Value>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RunRequest {
    pub data: WirePoints,
    pub n_clusters: WireInt,
    #[serde(default)]
    pub init_method: String,
    #[serde(default)]
    pub centroids: Option<Value>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub session: Option<String>,
}

impl InitializeRequest {
    pub fn method(&self) -> InitMethod {
        InitMethod::from_name(&self.init_method)
    }
}

impl StepRequest {
    pub fn method(&self) -> InitMethod {
        InitMethod::from_name(&self.init_method)
    }
}

impl RunRequest {
    pub fn method(&self) -> InitMethod {
        InitMethod::from_name(&self.init_method)
    }

    /// Caller-placed centroids. Unlike `prev_centers`, a non-empty payload
    /// that is not numeric is rejected.
    pub fn manual_centroids(&self) -> KmeansResult<Option<Vec<Point>>> {
        match &self.centroids {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(rows)) if rows.is_empty() => Ok(None),
            Some(value) => optional_centroids(&self.centroids)
                .map(Some)
                .ok_or_else(|| KmeansError::MalformedInput(format!("centroids must be a list of numeric rows, got {}", value))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Centers {
        centers: Vec<Point>,
    },
    Dataset {
        data: Vec<Point>,
    },
    Step {
        centers: Vec<Point>,
        labels: Vec<usize>,
        convergence_reached: bool,
        inertia: f64,
        iteration: usize,
    },
    Run {
        centers: Vec<Point>,
        labels: Vec<usize>,
        inertia: f64,
        n_iter: usize,
        converged: bool,
        clusters: Vec<ClusterSummary>,
    },
    Status {
        status: String,
    },
    Error {
        error: ErrorBody,
    },
}

impl From<VizError> for Response {
    fn from(err: VizError) -> Self {
        Response::Error {
            error: ErrorBody { kind: err.kind().to_string(), message: err.to_string() },
        }
    }
}

impl From<KmeansError> for Response {
    fn from(err: KmeansError) -> Self {
        VizError::from(err).into()
    }
}
