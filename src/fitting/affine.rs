//! Least-squares estimation of an [`AffineModel`] from control points.
//!
//! The six affine coefficients minimize the squared residuals of
//! `lon = a11*x + a12*y + b1` and `lat = a21*x + a22*y + b2` over the
//! control-point set. Because the two equations share the same design
//! matrix, the fit reduces to one 3x3 normal-equations matrix solved twice,
//! once per geographic axis.

use crate::linalg::solve_linear_system;
use crate::transform::{validation, AffineModel, ControlPoint, TransformError};
use log::{debug, info};
use nalgebra::{Matrix3, Vector3};

/// Builds the normal-equations system for the affine least-squares fit.
///
/// Returns the 3x3 coefficient matrix together with the two right-hand
/// sides, one for the longitude axis and one for the latitude axis. Only
/// the upper triangle of the matrix is accumulated; the lower triangle is
/// mirrored from it, so the result is symmetric by construction.
pub fn normal_equations(points: &[ControlPoint]) -> (Matrix3<f64>, Vector3<f64>, Vector3<f64>) {
    let mut a = Matrix3::zeros();
    let mut b_lon = Vector3::zeros();
    let mut b_lat = Vector3::zeros();

    for point in points {
        let x = point.x;
        let y = point.y;

        a[(0, 0)] += x * x;
        a[(0, 1)] += x * y;
        a[(0, 2)] += x;
        a[(1, 1)] += y * y;
        a[(1, 2)] += y;
        a[(2, 2)] += 1.0;

        b_lon[0] += x * point.lon;
        b_lon[1] += y * point.lon;
        b_lon[2] += point.lon;

        b_lat[0] += x * point.lat;
        b_lat[1] += y * point.lat;
        b_lat[2] += point.lat;
    }

    // Mirror the lower triangle from the upper one
    a[(1, 0)] = a[(0, 1)];
    a[(2, 0)] = a[(0, 2)];
    a[(2, 1)] = a[(1, 2)];

    (a, b_lon, b_lat)
}

/// Fits an [`AffineModel`] to a set of control points by least squares.
///
/// Accepts any set of at least three points with finite coordinates; four
/// points is the canonical calibration setup. The two per-axis systems are
/// solved independently, and either failure fails the whole fit, so a
/// partially-fitted model is never returned.
///
/// Degenerate point sets (e.g. all points collinear) make the normal
/// equations singular. The solver only detects this when elimination
/// cancels a pivot to exactly zero; when rounding leaves a tiny non-zero
/// pivot the fit instead returns a numerically meaningless model. Use
/// [`crate::fitting::residual_stats`] to judge the result, or
/// [`crate::linalg::solve_linear_system_with_tolerance`] to screen the
/// system directly.
///
/// # Errors
///
/// * [`TransformError::NotEnoughPoints`]: fewer than three points.
/// * [`TransformError::PointMustBeFinite`]: a coordinate is NaN or infinite.
/// * [`TransformError::SingularMatrix`]: the normal equations hit a zero
///   pivot on either axis.
///
/// # Examples
///
/// ```rust
/// use georef_tools::fitting::fit_affine;
/// use georef_tools::transform::ControlPoint;
///
/// let points = vec![
///     ControlPoint::new(0.0, 0.0, 10.0, 20.0),
///     ControlPoint::new(1.0, 0.0, 11.0, 20.0),
///     ControlPoint::new(1.0, 1.0, 11.0, 21.0),
///     ControlPoint::new(0.0, 1.0, 10.0, 21.0),
/// ];
///
/// let model = fit_affine(&points).unwrap();
/// assert!((model.a11 - 1.0).abs() < 1e-12);
/// assert!((model.b1 - 10.0).abs() < 1e-12);
/// ```
pub fn fit_affine(points: &[ControlPoint]) -> Result<AffineModel, TransformError> {
    validation::validate_control_points(points)?;

    let (a, b_lon, b_lat) = normal_equations(points);
    debug!("Normal equations matrix: {a}");
    debug!("Right-hand sides: lon {b_lon}, lat {b_lat}");

    let lon_coeffs = solve_linear_system(&a, &b_lon)?;
    let lat_coeffs = solve_linear_system(&a, &b_lat)?;

    let model = AffineModel {
        a11: lon_coeffs[0],
        a12: lon_coeffs[1],
        b1: lon_coeffs[2],
        a21: lat_coeffs[0],
        a22: lat_coeffs[1],
        b2: lat_coeffs[2],
    };

    info!(
        "Fitted affine model from {} control points: {:?}",
        points.len(),
        model
    );

    Ok(model)
}
