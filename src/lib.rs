//! Georef Tools Library
//!
//! A Rust library for georeferencing planar sensor frames: it estimates the
//! affine transformation mapping local (x, y) coordinates to geographic
//! (lon, lat) coordinates from a set of control-point correspondences.
//! This library provides:
//! - A planar affine georeferencing model with forward and inverse mapping
//! - Closed-form least-squares calibration via the normal equations
//! - A small Gaussian-elimination solver for the resulting 3x3 systems
//! - Residual statistics for judging calibration quality
//!
//! The canonical setup is four control points (e.g. the corners of a frame
//! with surveyed coordinates), but any three or more non-collinear points
//! calibrate a model.

pub mod fitting;
pub mod geometry;
pub mod linalg;
pub mod transform;

// Re-export commonly used types
pub use transform::{AffineModel, ControlPoint, GeoTransform, TransformError};

pub use fitting::{fit_affine, normal_equations, residual_stats, ResidualStats};
