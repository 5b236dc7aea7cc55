use kmeans::{
    KmeansDriver,
    driver::{DEFAULT_MAX_ITERATION, DEFAULT_N_INIT},
};
use rand::RngExt;
use tracing::debug;

pub const DEFAULT_DATASET_SIZE: usize = 100;
pub const DEFAULT_DATASET_RANGE: f64 = 100.0;
pub const DEFAULT_MAX_POINTS: usize = 100_000;

// Struct to hold the service settings shared by every request: driver tuning,
// the optional fixed seed and dataset generation bounds
#[derive(Clone, Debug)]
pub struct VizContext {
    pub max_iteration: usize,
    pub n_init: usize,
    pub seed: Option<u64>,
    pub dataset_size: usize,
    pub dataset_range: f64,
    pub max_points: usize,
}

impl Default for VizContext {
    fn default() -> Self {
        Self {
            max_iteration: DEFAULT_MAX_ITERATION,
            n_init: DEFAULT_N_INIT,
            seed: None,
            dataset_size: DEFAULT_DATASET_SIZE,
            dataset_range: DEFAULT_DATASET_RANGE,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl VizContext {
    /// Seed for one request: the request's own seed, then the configured one,
    /// then a fresh draw from the thread generator.
    pub fn resolve_seed(&self, request_seed: Option<u64>) -> u64 {
        let seed = request_seed
            .or(self.seed)
            .unwrap_or_else(|| rand::rng().random::<u64>());
        debug!(seed, "resolved request seed");
        seed
    }

    /// A fresh driver for one request. Drivers are never shared between requests.
    pub fn driver(&self, request_seed: Option<u64>) -> KmeansDriver {
        KmeansDriver::new(self.resolve_seed(request_seed))
            .with_max_iteration(self.max_iteration)
            .with_n_init(self.n_init)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_seed_wins_over_configured_seed() {
        let context = VizContext { seed: Some(5), ..VizContext::default() };
        assert_eq!(context.resolve_seed(Some(9)), 9);
        assert_eq!(context.resolve_seed(None), 5);
    }

    #[test]
    fn driver_carries_the_tuning() {
        let context = VizContext { max_iteration: 12, n_init: 3, ..VizContext::default() };
        let driver = context.driver(Some(1));
        assert_eq!(driver.max_iteration, 12);
        assert_eq!(driver.n_init, 3);
    }
}
