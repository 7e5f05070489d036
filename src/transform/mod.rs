use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub mod affine;

pub use affine::AffineModel;

/// One known correspondence between local planar coordinates (x, y)
/// and geographic coordinates (lon, lat).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub lon: f64,
    pub lat: f64,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64, lon: f64, lat: f64) -> Self {
        ControlPoint { x, y, lon, lat }
    }

    /// The local (x, y) side of the correspondence.
    pub fn local(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// The geographic (lon, lat) side of the correspondence.
    pub fn geographic(&self) -> Vector2<f64> {
        Vector2::new(self.lon, self.lat)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    #[error("Matrix singularity detected")]
    SingularMatrix,
    #[error("At least 3 control points are required, got {0}")]
    NotEnoughPoints(usize),
    #[error("Control point coordinates must be finite")]
    PointMustBeFinite,
    #[error("Zero control points")]
    ZeroControlPoints,
    #[error("Invalid transform parameters: {0}")]
    InvalidParams(String),
    #[error("Failed to load YAML: {0}")]
    YamlError(String),
    #[error("IO Error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::IOError(err.to_string())
    }
}

impl From<yaml_rust::ScanError> for TransformError {
    fn from(err: yaml_rust::ScanError) -> Self {
        TransformError::YamlError(err.to_string())
    }
}

/// Trait defining the core functionality for planar-to-geographic transforms
pub trait GeoTransform {
    /// Map a local (x, y) point to geographic (lon, lat) coordinates
    fn forward(&self, local: &Vector2<f64>) -> Result<Vector2<f64>, TransformError>;

    /// Map geographic (lon, lat) coordinates back to a local (x, y) point
    fn inverse(&self, geographic: &Vector2<f64>) -> Result<Vector2<f64>, TransformError>;

    /// Load transform parameters from a YAML file
    fn load_from_yaml(path: &str) -> Result<Self, TransformError>
    where
        Self: Sized;

    /// Save transform parameters to a YAML file
    fn save_to_yaml(&self, path: &str) -> Result<(), TransformError>;

    /// Validate transform parameters
    fn validate_params(&self) -> Result<(), TransformError>;
}

/// Loads control points from a YAML file.
///
/// The file is expected to contain a `control_points` array whose entries
/// are `[x, y, lon, lat]` arrays of four floats.
pub fn load_control_points_from_yaml(path: &str) -> Result<Vec<ControlPoint>, TransformError> {
    let contents = std::fs::read_to_string(path)?;
    let docs = yaml_rust::YamlLoader::load_from_str(&contents)?;
    let doc = &docs[0];

    let points_yaml = doc["control_points"].as_vec().ok_or_else(|| {
        TransformError::YamlError("YAML missing 'control_points' or not an array".to_string())
    })?;

    let mut points = Vec::with_capacity(points_yaml.len());
    for (i, entry) in points_yaml.iter().enumerate() {
        let fields = entry.as_vec().ok_or_else(|| {
            TransformError::InvalidParams(format!("Control point {i}: not an array"))
        })?;
        if fields.len() != 4 {
            return Err(TransformError::InvalidParams(format!(
                "Control point {i}: expected 4 values, got {}",
                fields.len()
            )));
        }
        let mut values = [0.0f64; 4];
        for (j, field) in fields.iter().enumerate() {
            values[j] = field.as_f64().ok_or_else(|| {
                TransformError::InvalidParams(format!(
                    "Control point {i}: value {j} is not a float"
                ))
            })?;
        }
        points.push(ControlPoint::new(values[0], values[1], values[2], values[3]));
    }

    Ok(points)
}

/// Common validation functions for calibration inputs
pub mod validation {
    use super::*;

    pub fn validate_control_points(points: &[ControlPoint]) -> Result<(), TransformError> {
        if points.len() < 3 {
            return Err(TransformError::NotEnoughPoints(points.len()));
        }
        for point in points {
            if !point.x.is_finite()
                || !point.y.is_finite()
                || !point.lon.is_finite()
                || !point.lat.is_finite()
            {
                return Err(TransformError::PointMustBeFinite);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests loading control points from "samples/control_points.yaml".
    #[test]
    fn test_load_control_points_from_yaml() {
        let points = load_control_points_from_yaml("samples/control_points.yaml").unwrap();

        assert_eq!(points.len(), 4);
        assert_eq!(points[0].x, 155.975164);
        assert_eq!(points[0].y, 764.0);
        assert_eq!(points[0].lon, 33.514767);
        assert_eq!(points[0].lat, 44.619784);
        assert_eq!(points[3].lat, 44.620228);
    }

    #[test]
    fn test_validate_rejects_too_few_points() {
        let points = vec![ControlPoint::new(0.0, 0.0, 0.0, 0.0)];
        let result = validation::validate_control_points(&points);
        assert!(matches!(result, Err(TransformError::NotEnoughPoints(1))));
    }
}
