//! Small dense linear-system routines used by the calibration fit.
//!
//! The fit reduces to 3x3 symmetric systems, solved here by Gaussian
//! elimination with back-substitution. Rows are eliminated in fixed order
//! with no reordering; a system whose diagonal carries a zero in the given
//! ordering is reported singular even if it is solvable under a row
//! permutation. Callers that want protection against near-zero pivots can
//! use [`solve_linear_system_with_tolerance`].

use crate::transform::TransformError;
use nalgebra::{Matrix3, Vector3};

/// Solves the 3x3 linear system `A * result = B` by Gaussian elimination.
///
/// The caller's `a` and `b` are never mutated; elimination runs on private
/// copies. Fails with [`TransformError::SingularMatrix`] when a diagonal
/// pivot is exactly zero during forward elimination. Near-zero pivots are
/// accepted and may produce a numerically poor solution.
///
/// # Examples
///
/// ```rust
/// use nalgebra::{Matrix3, Vector3};
/// use georef_tools::linalg::solve_linear_system;
///
/// let a = Matrix3::new(2.0, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0);
/// let b = Vector3::new(8.0, -11.0, -3.0);
///
/// let x = solve_linear_system(&a, &b).unwrap();
/// assert!((x[0] - 2.0).abs() < 1e-12);
/// assert!((x[1] - 3.0).abs() < 1e-12);
/// assert!((x[2] + 1.0).abs() < 1e-12);
/// ```
pub fn solve_linear_system(
    a: &Matrix3<f64>,
    b: &Vector3<f64>,
) -> Result<Vector3<f64>, TransformError> {
    solve_linear_system_with_tolerance(a, b, 0.0)
}

/// Solves `A * result = B` like [`solve_linear_system`], but rejects any
/// pivot whose magnitude is at or below `pivot_tolerance`.
///
/// A tolerance of `0.0` reproduces the exact-zero check of the plain
/// solver. A small positive tolerance (e.g. `1e-12`) turns numerically
/// unstable systems into [`TransformError::SingularMatrix`] failures
/// instead of garbage solutions.
pub fn solve_linear_system_with_tolerance(
    a: &Matrix3<f64>,
    b: &Vector3<f64>,
    pivot_tolerance: f64,
) -> Result<Vector3<f64>, TransformError> {
    let mut m = *a;
    let mut r = *b;

    // Forward elimination in fixed row order, no row swapping
    for i in 0..3 {
        let pivot = m[(i, i)];
        if pivot.abs() <= pivot_tolerance {
            return Err(TransformError::SingularMatrix);
        }

        for j in 0..3 {
            m[(i, j)] /= pivot;
        }
        r[i] /= pivot;

        for k in (i + 1)..3 {
            let factor = m[(k, i)];
            for j in 0..3 {
                m[(k, j)] -= factor * m[(i, j)];
            }
            r[k] -= factor * r[i];
        }
    }

    // Back-substitution on the unit-diagonal upper-triangular system
    let mut result = Vector3::zeros();
    for i in (0..3).rev() {
        result[i] = r[i];
        for j in (i + 1)..3 {
            result[i] -= m[(i, j)] * result[j];
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_known_system() {
        let a = Matrix3::new(2.0, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0);
        let b = Vector3::new(8.0, -11.0, -3.0);

        let x = solve_linear_system(&a, &b).unwrap();

        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solution_reconstructs_rhs() {
        let a = Matrix3::new(4.0, 1.0, 2.0, 1.0, 5.0, 3.0, 2.0, 3.0, 6.0);
        let b = Vector3::new(1.0, -2.0, 0.5);

        let x = solve_linear_system(&a, &b).unwrap();
        let reconstructed = a * x;

        for i in 0..3 {
            assert_relative_eq!(reconstructed[i], b[i], epsilon = 1e-9);
        }
    }

    /// A zero on the diagonal fails even though the system is solvable
    /// under a row permutation. Rows are eliminated in fixed order.
    #[test]
    fn test_zero_diagonal_reported_singular() {
        let a = Matrix3::new(0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let b = Vector3::new(1.0, 1.0, 1.0);

        let result = solve_linear_system(&a, &b);
        assert!(matches!(result, Err(TransformError::SingularMatrix)));
    }

    /// The caller's matrix and vector are untouched, and repeated calls
    /// with the same inputs give the same solution.
    #[test]
    fn test_inputs_not_mutated() {
        let a = Matrix3::new(3.0, 1.0, 0.0, 1.0, 4.0, 1.0, 0.0, 1.0, 5.0);
        let b = Vector3::new(1.0, 2.0, 3.0);
        let a_before = a;
        let b_before = b;

        let first = solve_linear_system(&a, &b).unwrap();
        let second = solve_linear_system(&a, &b).unwrap();

        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
        assert_eq!(first, second);
    }

    /// A tiny pivot passes the exact-zero check but fails under a
    /// positive tolerance.
    #[test]
    fn test_pivot_tolerance_rejects_near_singular() {
        let a = Matrix3::new(1e-14, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let b = Vector3::new(1.0, 1.0, 1.0);

        assert!(solve_linear_system(&a, &b).is_ok());

        let result = solve_linear_system_with_tolerance(&a, &b, 1e-12);
        assert!(matches!(result, Err(TransformError::SingularMatrix)));
    }
}
