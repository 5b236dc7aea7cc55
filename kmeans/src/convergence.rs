//! Convergence detection between two centroid sets

use crate::types::Point;

/// Absolute tolerance of the all-close comparison
pub const ABS_TOLERANCE: f64 = 1e-8;
/// Relative tolerance of the all-close comparison
pub const REL_TOLERANCE: f64 = 1e-5;

/// True iff `new` is indistinguishable from `old` under the default tolerances.
///
/// An absent `old` set (first call) never counts as converged.
pub fn converged(old: Option<&[Point]>, new: &[Point]) -> bool {
    match old {
        Some(old) => all_close(old, new, REL_TOLERANCE, ABS_TOLERANCE),
        None => false,
    }
}

/// Component-wise `|a - b| <= atol + rtol * |b|` over two centroid sets.
/// Sets of different shape are never close.
pub fn all_close(a: &[Point], b: &[Point], rtol: f64, atol: f64) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(ca, cb)| {
            ca.len() == cb.len()
                && ca.iter().zip(cb.iter()).all(|(x, y)| (x - y).abs() <= atol + rtol * y.abs())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_is_never_converged() {
        assert!(!converged(None, &[vec![1.0, 2.0]]));
    }

    #[test]
    fn tolerance_is_absolute_plus_relative() {
        let old = vec![vec![1000.0, 0.0]];
        // relative slack at 1000.0 is about 1e-2
        assert!(converged(Some(old.as_slice()), &[vec![1000.005, 0.0]]));
        assert!(!converged(Some(old.as_slice()), &[vec![1000.05, 0.0]]));
        // near zero only the absolute term applies
        assert!(converged(Some(old.as_slice()), &[vec![1000.0, 5e-9]]));
        assert!(!converged(Some(old.as_slice()), &[vec![1000.0, 1e-6]]));
    }

    #[test]
    fn shape_mismatch_is_not_close() {
        let old = vec![vec![1.0, 1.0]];
        assert!(!converged(Some(old.as_slice()), &[vec![1.0, 1.0], vec![1.0, 1.0]]));
        assert!(!converged(Some(old.as_slice()), &[vec![1.0]]));
    }
}
