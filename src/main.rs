//! Affine Georeferencing Calibration
//!
//! This tool fits a planar affine georeferencing model to a set of
//! control-point correspondences and prints the resulting coefficients.
//!
//! Usage:
//! ```bash
//! cargo run -- --points samples/control_points.yaml
//! ```
//!
//! Without arguments it calibrates against a built-in reference frame:
//! four surveyed corner points of a 1072x764 sensor frame.

use clap::Parser;
use georef_tools::fitting::{fit_affine, residual_stats};
use georef_tools::transform::{load_control_points_from_yaml, ControlPoint, GeoTransform};
use log::info;
use std::path::PathBuf;

/// Affine georeferencing calibration tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML file of control points (defaults to built-in reference points)
    #[arg(short = 'p', long)]
    points: Option<PathBuf>,

    /// Path to save the fitted model as YAML
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

/// Surveyed corner correspondences of the reference frame.
fn reference_points() -> Vec<ControlPoint> {
    vec![
        ControlPoint::new(155.975164, 764.0, 33.514767, 44.619784),
        ControlPoint::new(916.024836, 764.0, 33.514149, 44.619707),
        ControlPoint::new(916.024836, 0.0, 33.514040, 44.620150),
        ControlPoint::new(155.975164, 0.0, 33.514658, 44.620228),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let points = match &cli.points {
        Some(path) => {
            info!("Loading control points from {}", path.display());
            load_control_points_from_yaml(path.to_str().ok_or("Invalid points path")?)?
        }
        None => {
            info!("Using built-in reference control points");
            reference_points()
        }
    };

    let model = fit_affine(&points)?;

    println!("Affine transform coefficients:");
    println!(
        "lon = {:.10e} * x + {:.10e} * y + {:.10}",
        model.a11, model.a12, model.b1
    );
    println!(
        "lat = {:.10e} * x + {:.10e} * y + {:.10}",
        model.a21, model.a22, model.b2
    );

    let stats = residual_stats(&model, &points)?;
    info!("Calibration residuals: {stats:?}");

    if let Some(path) = &cli.output {
        model.save_to_yaml(path.to_str().ok_or("Invalid output path")?)?;
        info!("Saved fitted model to {}", path.display());
    }

    Ok(())
}
