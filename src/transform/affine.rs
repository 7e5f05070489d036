//! Implements the planar affine georeferencing model.
//!
//! This module provides the [`AffineModel`] struct and its associated methods
//! for representing and applying a 2D affine map from local planar coordinates
//! to geographic coordinates. It adheres to the [`GeoTransform`] trait defined
//! in the parent `transform` module ([`crate::transform`]). The affine model is
//! the simplest georeferencing model: a linear map plus a translation, with no
//! curvature or projection terms.

use crate::transform::{GeoTransform, TransformError};
use nalgebra::{DVector, Vector2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use yaml_rust::YamlLoader;

/// Represents a planar affine georeferencing model.
///
/// This struct holds the six coefficients of an affine map from local
/// (x, y) coordinates to geographic (lon, lat) coordinates:
///
/// `lon = a11 * x + a12 * y + b1`
/// `lat = a21 * x + a22 * y + b2`
///
/// A model is normally produced by [`crate::fitting::fit_affine`] from a set
/// of control points, and is immutable once constructed.
///
/// # Examples
///
/// ```rust
/// use nalgebra::DVector;
/// use georef_tools::transform::affine::AffineModel;
///
/// // Identity map: lon = x, lat = y
/// let params = DVector::from_vec(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
/// let model = AffineModel::new(&params).unwrap();
///
/// assert_eq!(model.a11, 1.0);
/// assert_eq!(model.b2, 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffineModel {
    /// Coefficient of x in the longitude equation.
    pub a11: f64,
    /// Coefficient of y in the longitude equation.
    pub a12: f64,
    /// Constant term of the longitude equation.
    pub b1: f64,
    /// Coefficient of x in the latitude equation.
    pub a21: f64,
    /// Coefficient of y in the latitude equation.
    pub a22: f64,
    /// Constant term of the latitude equation.
    pub b2: f64,
}

impl AffineModel {
    /// Creates a new [`AffineModel`] from a vector of parameters.
    ///
    /// # Arguments
    ///
    /// * `parameters` - A `&DVector<f64>` containing the six coefficients in
    ///   the order: `a11`, `a12`, `b1`, `a21`, `a22`, `b2`.
    ///
    /// # Return Value
    ///
    /// Returns a `Result<Self, TransformError>`. On success, it provides the
    /// [`AffineModel`] instance.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParams`] if fewer than six parameters
    /// are supplied or any coefficient is not finite, as checked by
    /// `validate_params`.
    pub fn new(parameters: &DVector<f64>) -> Result<Self, TransformError> {
        if parameters.len() != 6 {
            return Err(TransformError::InvalidParams(format!(
                "Affine model requires 6 parameters, got {}",
                parameters.len()
            )));
        }

        let model = AffineModel {
            a11: parameters[0],
            a12: parameters[1],
            b1: parameters[2],
            a21: parameters[3],
            a22: parameters[4],
            b2: parameters[5],
        };

        model.validate_params()?;

        Ok(model)
    }

    /// Returns the six coefficients as a parameter vector in the order
    /// `a11`, `a12`, `b1`, `a21`, `a22`, `b2`.
    pub fn parameters(&self) -> DVector<f64> {
        DVector::from_vec(vec![
            self.a11, self.a12, self.b1, self.a21, self.a22, self.b2,
        ])
    }

    /// Determinant of the 2x2 linear part. Zero when the model collapses the
    /// plane onto a line and no inverse map exists.
    pub fn determinant(&self) -> f64 {
        self.a11 * self.a22 - self.a12 * self.a21
    }
}

impl GeoTransform for AffineModel {
    /// Maps a local (x, y) point to geographic (lon, lat) coordinates.
    ///
    /// This method applies the affine equations:
    /// `lon = a11 * x + a12 * y + b1`
    /// `lat = a21 * x + a22 * y + b2`
    ///
    /// # Arguments
    ///
    /// * `local` - A `&Vector2<f64>` holding the local (x, y) coordinates.
    ///
    /// # Return Value
    ///
    /// Returns a `Result<Vector2<f64>, TransformError>` with the geographic
    /// (lon, lat) coordinates. For a validated model this never fails; the
    /// `Result` keeps the [`GeoTransform`] contract uniform across models.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nalgebra::{DVector, Vector2};
    /// use georef_tools::transform::affine::AffineModel;
    /// use georef_tools::transform::GeoTransform;
    ///
    /// let params = DVector::from_vec(vec![2.0, 0.0, 10.0, 0.0, 3.0, 20.0]);
    /// let model = AffineModel::new(&params).unwrap();
    ///
    /// let geographic = model.forward(&Vector2::new(1.0, 1.0)).unwrap();
    /// assert!((geographic.x - 12.0).abs() < 1e-12);
    /// assert!((geographic.y - 23.0).abs() < 1e-12);
    /// ```
    fn forward(&self, local: &Vector2<f64>) -> Result<Vector2<f64>, TransformError> {
        let lon = self.a11 * local.x + self.a12 * local.y + self.b1;
        let lat = self.a21 * local.x + self.a22 * local.y + self.b2;
        Ok(Vector2::new(lon, lat))
    }

    /// Maps geographic (lon, lat) coordinates back to a local (x, y) point.
    ///
    /// Inverts the 2x2 linear part of the model and applies it to the
    /// translated coordinates.
    ///
    /// # Errors
    ///
    /// * [`TransformError::SingularMatrix`]: if the determinant of the linear
    ///   part is exactly zero, no inverse map exists.
    fn inverse(&self, geographic: &Vector2<f64>) -> Result<Vector2<f64>, TransformError> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(TransformError::SingularMatrix);
        }

        let du = geographic.x - self.b1;
        let dv = geographic.y - self.b2;

        let x = (self.a22 * du - self.a12 * dv) / det;
        let y = (self.a11 * dv - self.a21 * du) / det;

        Ok(Vector2::new(x, y))
    }

    /// Loads model coefficients from a YAML file.
    ///
    /// The YAML file is expected to contain a `transform0` mapping with a
    /// `coefficients` array of six floats in the order
    /// `a11, a12, b1, a21, a22, b2`.
    ///
    /// # Related
    /// * [`AffineModel::save_to_yaml()`]
    fn load_from_yaml(path: &str) -> Result<Self, TransformError> {
        let contents = fs::read_to_string(path)?;
        let docs = YamlLoader::load_from_str(&contents)?;
        let doc = &docs[0];

        let coefficients_yaml = doc["transform0"]["coefficients"].as_vec().ok_or_else(|| {
            TransformError::YamlError("YAML missing 'coefficients' or not an array".to_string())
        })?;

        if coefficients_yaml.len() != 6 {
            return Err(TransformError::InvalidParams(format!(
                "Expected 6 coefficients, got {}",
                coefficients_yaml.len()
            )));
        }

        let mut coefficients = [0.0f64; 6];
        for (i, value) in coefficients_yaml.iter().enumerate() {
            coefficients[i] = value.as_f64().ok_or_else(|| {
                TransformError::InvalidParams(format!("Invalid coefficient {i}: not a float"))
            })?;
        }

        let model = AffineModel {
            a11: coefficients[0],
            a12: coefficients[1],
            b1: coefficients[2],
            a21: coefficients[3],
            a22: coefficients[4],
            b2: coefficients[5],
        };

        // Validate parameters
        model.validate_params()?;

        Ok(model)
    }

    /// Saves the model coefficients to a YAML file.
    ///
    /// The output includes the transform model type ("affine") and the six
    /// coefficients in the order `a11, a12, b1, a21, a22, b2`.
    ///
    /// # Related
    /// * [`AffineModel::load_from_yaml()`]
    fn save_to_yaml(&self, path: &str) -> Result<(), TransformError> {
        // Create the YAML structure using serde_yaml
        let yaml = serde_yaml::to_value(&serde_yaml::Mapping::from_iter([(
            serde_yaml::Value::String("transform0".to_string()),
            serde_yaml::to_value(&serde_yaml::Mapping::from_iter([
                (
                    serde_yaml::Value::String("transform_model".to_string()),
                    serde_yaml::Value::String("affine".to_string()),
                ),
                (
                    serde_yaml::Value::String("coefficients".to_string()),
                    serde_yaml::to_value(vec![
                        self.a11, self.a12, self.b1, self.a21, self.a22, self.b2,
                    ])
                    .map_err(|e| TransformError::YamlError(e.to_string()))?,
                ),
            ]))
            .map_err(|e| TransformError::YamlError(e.to_string()))?,
        )]))
        .map_err(|e| TransformError::YamlError(e.to_string()))?;

        // Convert to string
        let yaml_string =
            serde_yaml::to_string(&yaml).map_err(|e| TransformError::YamlError(e.to_string()))?;

        // Write to file
        let mut file =
            fs::File::create(path).map_err(|e| TransformError::IOError(e.to_string()))?;

        file.write_all(yaml_string.as_bytes())
            .map_err(|e| TransformError::IOError(e.to_string()))?;

        Ok(())
    }

    /// Validates the model coefficients.
    ///
    /// All six coefficients must be finite numbers.
    fn validate_params(&self) -> Result<(), TransformError> {
        let coefficients = [self.a11, self.a12, self.b1, self.a21, self.a22, self.b2];
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(TransformError::InvalidParams(
                "All affine coefficients must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Contains unit tests for the affine georeferencing model.
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Tests loading [`AffineModel`] coefficients from a YAML file.
    #[test]
    fn test_affine_load_from_yaml() {
        let path = "samples/affine.yaml";
        let model = AffineModel::load_from_yaml(path).unwrap();

        assert_eq!(model.a11, -8.131047518761259e-7);
        assert_eq!(model.a12, 1.426701570703126e-7);
        assert_eq!(model.b1, 33.51478482414701);
        assert_eq!(model.a21, -1.0196701984155343e-7);
        assert_eq!(model.a22, -5.804973822083614e-7);
        assert_eq!(model.b2, 44.62024365432264);
    }

    /// Tests saving [`AffineModel`] coefficients and reloading them.
    #[test]
    fn test_affine_save_to_yaml() {
        fs::create_dir_all("output").expect("Failed to create output directory for test.");

        let input_path = "samples/affine.yaml";
        let output_path = "output/affine_saved.yaml";

        let model = AffineModel::load_from_yaml(input_path).unwrap();
        model.save_to_yaml(output_path).unwrap();

        let reloaded = AffineModel::load_from_yaml(output_path).unwrap();

        assert_eq!(model.a11, reloaded.a11);
        assert_eq!(model.a12, reloaded.a12);
        assert_eq!(model.b1, reloaded.b1);
        assert_eq!(model.a21, reloaded.a21);
        assert_eq!(model.a22, reloaded.a22);
        assert_eq!(model.b2, reloaded.b2);
    }

    /// Tests the forward and inverse application consistency of the model.
    #[test]
    fn test_affine_forward_inverse() {
        let params = DVector::from_vec(vec![2.0, 0.5, 100.0, -0.25, 3.0, 200.0]);
        let model = AffineModel::new(&params).unwrap();

        let local = Vector2::new(17.0, -4.0);
        let geographic = model.forward(&local).unwrap();
        let recovered = model.inverse(&geographic).unwrap();

        assert_relative_eq!(recovered.x, local.x, epsilon = 1e-12);
        assert_relative_eq!(recovered.y, local.y, epsilon = 1e-12);
    }

    /// Tests that a model with a degenerate linear part has no inverse.
    #[test]
    fn test_affine_inverse_singular() {
        // Second row is a multiple of the first, determinant is exactly zero
        let params = DVector::from_vec(vec![1.0, 2.0, 0.0, 2.0, 4.0, 0.0]);
        let model = AffineModel::new(&params).unwrap();

        let result = model.inverse(&Vector2::new(1.0, 1.0));
        assert!(matches!(result, Err(TransformError::SingularMatrix)));
    }

    /// Tests that non-finite coefficients are rejected.
    #[test]
    fn test_affine_rejects_non_finite_params() {
        let params = DVector::from_vec(vec![1.0, 0.0, f64::NAN, 0.0, 1.0, 0.0]);
        assert!(AffineModel::new(&params).is_err());
    }

    /// Tests that the wrong number of parameters is rejected.
    #[test]
    fn test_affine_rejects_wrong_param_count() {
        let params = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        assert!(AffineModel::new(&params).is_err());
    }
}
