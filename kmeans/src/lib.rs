//! Step-wise K-Means engine
//!
//! Pure, reentrant building blocks for an interactive K-Means visualization:
//! centroid initialization (random, farthest-first, K-Means++, manual), one
//! assignment-update step at a time, all-close convergence detection and a
//! driver that either resumes from caller-held centroids or runs to convergence.

pub mod convergence;
pub mod driver;
pub mod error;
pub mod init;
pub mod step;
pub mod tools;
pub mod types;

pub use driver::{KmeansDriver, RunResult, StepResult};
pub use error::{KmeansError, KmeansResult};
pub use types::{InitMethod, Point};

#[cfg(test)]
mod tests {
    use rand::{RngExt, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    use super::*;

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut rng = ChaCha20Rng::seed_from_u64(55);
        let first: Vec<f64> = (0..3).map(|_| rng.random_range(0.0..52.0)).collect();
        let mut rng = ChaCha20Rng::seed_from_u64(55);
        let second: Vec<f64> = (0..3).map(|_| rng.random_range(0.0..52.0)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn seeded_initialization_is_reproducible() {
        let points: Vec<Point> = (0..10).map(|i| vec![i as f64, (i * 3 % 7) as f64]).collect();
        let mut a = ChaCha20Rng::seed_from_u64(55);
        let mut b = ChaCha20Rng::seed_from_u64(55);
        assert_eq!(
            init::initialize(&points, 4, InitMethod::PlusPlus, &mut a).unwrap(),
            init::initialize(&points, 4, InitMethod::PlusPlus, &mut b).unwrap(),
        );
    }
}
