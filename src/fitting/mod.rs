//! The `fitting` module estimates georeferencing models from control points.
//!
//! The estimation is a closed-form linear least-squares fit: the control
//! points are reduced to a small normal-equations system which is solved
//! directly by [`crate::linalg`]. There is no iterative refinement stage;
//! for an affine model the normal equations already give the least-squares
//! optimum.
//!
//! This module re-exports the affine fit entry points from its submodule
//! and provides residual statistics for judging fit quality.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod affine;

pub use affine::{fit_affine, normal_equations};

use crate::transform::{ControlPoint, GeoTransform, TransformError};

/// Summary statistics of per-point fit residuals, in geographic units.
#[derive(Clone, Serialize, Deserialize)]
pub struct ResidualStats {
    pub rmse: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
    pub median: f64,
}

impl fmt::Debug for ResidualStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Residuals [ rmse: {}, min: {}, max: {}, mean: {}, stddev: {}, median: {} ]",
            self.rmse, self.min, self.max, self.mean, self.stddev, self.median
        )
    }
}

/// Computes residual statistics of a fitted transform over a control-point set.
///
/// Each residual is the Euclidean distance between the transform's predicted
/// geographic coordinates and the observed ones.
///
/// # Errors
///
/// * [`TransformError::ZeroControlPoints`]: if `points` is empty.
pub fn residual_stats<T>(
    transform: &T,
    points: &[ControlPoint],
) -> Result<ResidualStats, TransformError>
where
    T: ?Sized + GeoTransform,
{
    let mut errors = vec![];
    for point in points {
        let predicted = transform.forward(&point.local())?;
        let residual = (predicted - point.geographic()).norm();
        errors.push(residual);
    }

    if errors.is_empty() {
        return Err(TransformError::ZeroControlPoints);
    }

    // Calculate statistics
    let n = errors.len() as f64;
    let sum: f64 = errors.iter().sum::<f64>();
    let mean = sum / n;

    // Calculate variance and standard deviation
    let variance: f64 = errors.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    // Calculate RMSE
    let sum_squared: f64 = errors.iter().map(|x| x.powi(2)).sum::<f64>();
    let rmse = (sum_squared / n).sqrt();

    // Find min and max
    let min = errors.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = errors.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    // Calculate median
    let mut sorted_errors = errors.clone();
    sorted_errors.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median = if sorted_errors.len() % 2 == 0 {
        let mid = sorted_errors.len() / 2;
        (sorted_errors[mid - 1] + sorted_errors[mid]) / 2.0
    } else {
        sorted_errors[sorted_errors.len() / 2]
    };

    Ok(ResidualStats {
        rmse,
        min,
        max,
        mean,
        stddev,
        median,
    })
}
