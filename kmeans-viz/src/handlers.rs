//! Request handlers: decode, run the engine, encode.

use kmeans::{KmeansError, StepResult};
use tracing::{debug, info, warn};

use crate::{
    context::VizContext,
    dataset::{DatasetShape, generate_dataset},
    error::{VizError, VizResult},
    metrics::cluster_summaries,
    protocol::{
        GenerateRequest, InitializeRequest, Request, ResetRequest, Response, RunRequest, StepRequest,
        optional_centroids,
    },
    session::{SessionState, SessionStore},
};

const DEFAULT_BLOBS: usize = 3;

pub struct Handlers {
    context: VizContext,
    sessions: SessionStore,
}

impl Handlers {
    pub fn new(context: VizContext) -> Self {
        Self { context, sessions: SessionStore::new() }
    }

    pub fn context(&self) -> &VizContext {
        &self.context
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Decode one JSON line and dispatch it.
    pub async fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                VizError::BadRequest(e.to_string()).into()
            }
        }
    }

    pub async fn dispatch(&self, request: Request) -> Response {
        let op = request.op();
        let result = match request {
            Request::InitializeCentroids(req) => self.initialize(req),
            Request::GenerateDataset(req) => self.generate(req),
            Request::RunKmeansStep(req) => self.step(req).await,
            Request::RunKmeans(req) => self.run(req).await,
            Request::ResetKmeans(req) => self.reset(req).await,
        };
        match result {
            Ok(response) => {
                debug!(op, "request handled");
                response
            }
            Err(err) => {
                warn!(op, kind = err.kind(), "request rejected: {}", err);
                err.into()
            }
        }
    }

    fn initialize(&self, req: InitializeRequest) -> VizResult<Response> {
        let points = req.data.to_points("data")?;
        let n_clusters = req.n_clusters.positive("n_clusters")?;
        let mut driver = self.context.driver(req.seed);
        let centers = driver.initialize(&points, n_clusters, req.method())?.unwrap_or_default();
        Ok(Response::Centers { centers })
    }

    fn generate(&self, req: GenerateRequest) -> VizResult<Response> {
        let n_points = match req.n_points {
            Some(n) => n.positive("n_points")?,
            None => self.context.dataset_size,
        };
        if n_points > self.context.max_points {
            return Err(KmeansError::invalid("n_points", format!("at most {}", self.context.max_points), n_points).into());
        }
        let n_blobs = match req.n_blobs {
            Some(n) => n.positive("n_blobs")?,
            None => DEFAULT_BLOBS.min(n_points),
        };
        if n_blobs > n_points {
            return Err(KmeansError::invalid("n_blobs", format!("at most n_points ({})", n_points), n_blobs).into());
        }
        let shape = DatasetShape::from_name(req.shape.as_deref(), n_blobs);
        let seed = self.context.resolve_seed(req.seed);
        let data = generate_dataset(n_points, shape, self.context.dataset_range, seed)?;
        Ok(Response::Dataset { data })
    }

    async fn step(&self, req: StepRequest) -> VizResult<Response> {
        let points = req.data.to_points("data")?;
        let n_clusters = req.n_clusters.positive("n_clusters")?;
        let requested_iteration = req.current_iter.map(|i| i.positive("current_iter")).transpose()?;
        let prev_centers = optional_centroids(&req.prev_centers);
        let method = req.method();
        let mut driver = self.context.driver(req.seed);

        // Explicit fields win over what the session remembers
        let mut run_step = |session: Option<&SessionState>| -> VizResult<(usize, StepResult)> {
            let iteration = requested_iteration
                .unwrap_or_else(|| session.map(|s| s.iteration + 1).unwrap_or(1));
            let previous = prev_centers.clone().or_else(|| session.map(|s| s.centroids.clone()));
            let result = driver.step(&points, n_clusters, method, iteration, previous.as_deref())?;
            Ok((iteration, result))
        };

        let (iteration, result) = match &req.session {
            Some(id) => {
                self.sessions
                    .update(id, |session| {
                        let (iteration, result) = run_step(session)?;
                        let state = SessionState { centroids: result.centroids.clone(), iteration };
                        Ok::<_, VizError>((state, (iteration, result)))
                    })
                    .await?
            }
            None => run_step(None)?,
        };

        Ok(Response::Step {
            centers: result.centroids,
            labels: result.labels,
            convergence_reached: result.converged,
            inertia: result.inertia,
            iteration,
        })
    }

    async fn run(&self, req: RunRequest) -> VizResult<Response> {
        let points = req.data.to_points("data")?;
        let n_clusters = req.n_clusters.positive("n_clusters")?;
        let manual = req.manual_centroids()?;
        let method = req.method();
        let mut driver = self.context.driver(req.seed);

        // A full run can take up to max_iteration * n_init steps, keep it off the reactor
        let (result, points) = tokio::task::spawn_blocking(move || {
            driver
                .run_to_convergence(&points, n_clusters, method, manual.as_deref())
                .map(|result| (result, points))
        })
        .await
        .map_err(|e| VizError::Task(e.to_string()))??;

        let clusters = cluster_summaries(&points, &result.centroids, &result.labels);
        Ok(Response::Run {
            centers: result.centroids,
            labels: result.labels,
            inertia: result.inertia,
            n_iter: result.n_iter,
            converged: result.converged,
            clusters,
        })
    }

    async fn reset(&self, req: ResetRequest) -> VizResult<Response> {
        if let Some(id) = &req.session {
            let existed = self.sessions.reset(id).await;
            info!(session = %id, existed, "session reset");
        }
        Ok(Response::Status { status: "Reset successful".to_string() })
    }
}
