//! K-Means driver
//! Orchestrates initialization, assignment-update steps and convergence
//! detection into the single-step (caller-resumable) and run-to-convergence modes.
//! The driver owns nothing but its tuning knobs and a seeded random source;
//! all continuation state travels through the caller's inputs and outputs.

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    convergence::converged,
    error::{KmeansError, KmeansResult},
    init::{generate_centroids, initialize},
    step::{StepOutcome, assign_points, inertia, step},
    tools::{centroids_fit, validate_n_clusters, validate_points},
    types::{InitMethod, Point},
};

/// Iteration cap of `run_to_convergence`
pub const DEFAULT_MAX_ITERATION: usize = 300;
/// Number of generated starts tried when the caller supplies none
pub const DEFAULT_N_INIT: usize = 10;

/// Outcome of a single `step` call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub centroids: Vec<Point>,
    pub labels: Vec<usize>,
    pub converged: bool,
    /// Sum of squared distances of points to their nearest returned centroid
    pub inertia: f64,
}

/// Outcome of `run_to_convergence`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub centroids: Vec<Point>,
    pub labels: Vec<usize>,
    pub inertia: f64,
    /// Assignment-update steps performed by the kept run
    pub n_iter: usize,
    /// False when the iteration cap stopped the loop
    pub converged: bool,
}

#[derive(Clone, Debug)]
pub struct KmeansDriver {
    pub max_iteration: usize,
    pub n_init: usize,
    pub rng: ChaCha20Rng,
}

impl KmeansDriver {
    pub fn new(seed: u64) -> Self {
        Self {
            max_iteration: DEFAULT_MAX_ITERATION,
            n_init: DEFAULT_N_INIT,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn with_max_iteration(mut self, max_iteration: usize) -> Self {
        self.max_iteration = max_iteration.max(1);
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    /// Initial centroids for `method`; `None` for manual initialization.
    pub fn initialize(&mut self, points: &[Point], n_clusters: usize, method: InitMethod) -> KmeansResult<Option<Vec<Point>>> {
        validate_points(points)?;
        validate_n_clusters(n_clusters, points.len())?;
        initialize(points, n_clusters, method, &mut self.rng)
    }

    /// Advance the algorithm by exactly one assignment-update step.
    ///
    /// # Arguments
    /// * `iteration` - 1 for the first call of a run, incremented by the caller afterwards
    /// * `previous` - Centroids returned by the previous call
    ///
    /// # Starting centroids
    /// * iteration 1: generated with `method`; a manual run starts from `previous`
    ///   when it holds `n_clusters` centroids of the right dimension
    /// * later iterations: `previous` when it is well formed, otherwise a fresh
    ///   generated start (manual falls back to random)
    ///
    /// Returned labels are nearest-centroid indices against the returned centroids.
    pub fn step(
        &mut self,
        points: &[Point],
        n_clusters: usize,
        method: InitMethod,
        iteration: usize,
        previous: Option<&[Point]>,
    ) -> KmeansResult<StepResult> {
        let dim = validate_points(points)?;
        validate_n_clusters(n_clusters, points.len())?;
        if iteration == 0 {
            return Err(KmeansError::invalid("current_iter", "an integer >= 1", iteration));
        }

        let usable = previous.filter(|c| centroids_fit(c, n_clusters, dim));
        let supplied = if iteration == 1 && method != InitMethod::Manual { None } else { usable };

        let (outcome, score) = match supplied {
            Some(start) => single_step(points, start),
            None => {
                if iteration > 1 {
                    debug!(iteration, "previous centroids unusable, restarting initialization");
                }
                self.best_of_starts(points, n_clusters, method, |points, start| single_step(points, &start))?
            }
        };

        let converged = converged(previous, &outcome.centroids);
        debug!(iteration, converged, inertia = score, "kmeans step");

        Ok(StepResult {
            centroids: outcome.centroids,
            labels: outcome.labels,
            converged,
            inertia: score,
        })
    }

    /// Iterate until the centroids stop moving or `max_iteration` steps were taken.
    ///
    /// Reaching the cap is not an error; the last centroids are returned as they are.
    pub fn run_to_convergence(
        &mut self,
        points: &[Point],
        n_clusters: usize,
        method: InitMethod,
        manual: Option<&[Point]>,
    ) -> KmeansResult<RunResult> {
        let dim = validate_points(points)?;
        validate_n_clusters(n_clusters, points.len())?;

        let fit_timer = Instant::now();
        let result = match manual {
            Some(start) => {
                if !centroids_fit(start, n_clusters, dim) {
                    return Err(KmeansError::invalid(
                        "centroids",
                        format!("{} finite centroids of dimension {}", n_clusters, dim),
                        format!("{} centroids", start.len()),
                    ));
                }
                self.fit(points, start.to_vec())
            }
            None => {
                let max_iteration = self.max_iteration;
                self.best_of_starts(points, n_clusters, method, |points, start| {
                    let result = fit_from(points, start, max_iteration);
                    let score = result.inertia;
                    (result, score)
                })?
                .0
            }
        };
        debug!(
            n_iter = result.n_iter,
            converged = result.converged,
            inertia = result.inertia,
            elapsed = ?fit_timer.elapsed(),
            "kmeans fit finished"
        );
        Ok(result)
    }

    fn fit(&self, points: &[Point], start: Vec<Point>) -> RunResult {
        fit_from(points, start, self.max_iteration)
    }

    /// Try `n_init` generated starts and keep the lowest scoring outcome
    /// (first one wins on equal scores).
    fn best_of_starts<T, F>(
        &mut self,
        points: &[Point],
        n_clusters: usize,
        method: InitMethod,
        mut evaluate: F,
    ) -> KmeansResult<(T, f64)>
    where
        F: FnMut(&[Point], Vec<Point>) -> (T, f64),
    {
        let mut best: Option<(T, f64)> = None;
        for attempt in 0..self.n_init {
            let start = generate_centroids(points, n_clusters, method, &mut self.rng)?;
            let (candidate, score) = evaluate(points, start);
            debug!(attempt, score, "evaluated start");
            if best.as_ref().is_none_or(|(_, best_score)| score < *best_score) {
                best = Some((candidate, score));
            }
        }
        best.ok_or_else(|| KmeansError::invalid("n_init", "a positive integer", self.n_init))
    }
}

/// One assignment-update step, relabelled against the updated centroids
fn single_step(points: &[Point], start: &[Point]) -> (StepOutcome, f64) {
    let updated = step(points, start).centroids;
    let labels = assign_points(points, &updated);
    let score = inertia(points, &updated, &labels);
    (StepOutcome { centroids: updated, labels }, score)
}

/// Lloyd iterations from a fixed start
fn fit_from(points: &[Point], start: Vec<Point>, max_iteration: usize) -> RunResult {
    let mut centroids = start;
    let mut n_iter = 0;
    let mut done = false;
    while n_iter < max_iteration {
        let outcome = step(points, &centroids);
        n_iter += 1;
        let stop = converged(Some(centroids.as_slice()), &outcome.centroids);
        centroids = outcome.centroids;
        if stop {
            done = true;
            break;
        }
    }
    // Labels against the final centroids, so the returned pair is consistent
    let labels = assign_points(points, &centroids);
    let inertia = inertia(points, &centroids, &labels);
    RunResult { centroids, labels, inertia, n_iter, converged: done }
}
