//! Random 2-D datasets for the visualization client

use kmeans::{KmeansError, Point};
use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{VizError, VizResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetShape {
    /// Points uniform in `[0, range)` on both axes
    Uniform,
    /// Gaussian blobs around uniformly placed centres
    Blobs(usize),
}

impl DatasetShape {
    /// Resolve a wire name; unknown names fall back to `Uniform`.
    pub fn from_name(name: Option<&str>, n_blobs: usize) -> Self {
        match name {
            Some("blobs") => DatasetShape::Blobs(n_blobs.max(1)),
            _ => DatasetShape::Uniform,
        }
    }
}

/// Sample `n_points` 2-D points inside `[0, range)` on both axes.
pub fn generate_dataset(n_points: usize, shape: DatasetShape, range: f64, seed: u64) -> VizResult<Vec<Point>> {
    if !(range.is_finite() && range > 0.0) {
        return Err(KmeansError::invalid("dataset_range", "a positive finite number", range).into());
    }
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    match shape {
        DatasetShape::Uniform => Ok((0..n_points)
            .map(|_| vec![rng.random_range(0.0..range), rng.random_range(0.0..range)])
            .collect()),
        DatasetShape::Blobs(n_blobs) => {
            // More centres than points would never be sampled
            let n_blobs = n_blobs.clamp(1, n_points.max(1));
            let centres: Vec<(f64, f64)> = (0..n_blobs)
                .map(|_| (rng.random_range(0.15 * range..0.85 * range), rng.random_range(0.15 * range..0.85 * range)))
                .collect();
            let noise = Normal::new(0.0, 0.05 * range).map_err(|e| VizError::BadRequest(e.to_string()))?;
            // Largest representable value below `range`, keeps clamped points inside the half-open box
            let upper = range - range * f64::EPSILON;
            Ok((0..n_points)
                .map(|i| {
                    let (cx, cy) = centres[i % n_blobs];
                    let x: f64 = cx + noise.sample(&mut rng);
                    let y: f64 = cy + noise.sample(&mut rng);
                    vec![x.clamp(0.0, upper), y.clamp(0.0, upper)]
                })
                .collect())
        }
    }
}
