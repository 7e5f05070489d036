use crate::transform::{ControlPoint, GeoTransform, TransformError};
use nalgebra::Vector2;

/// Generate control points on a grid that is evenly distributed across a frame,
/// using a ground-truth transform to supply the geographic side
///
/// # Arguments
///
/// * `width` - The width of the frame in local units
/// * `height` - The height of the frame in local units
/// * `n` - The approximate number of points to generate
/// * `transform` - Ground-truth transform mapping local to geographic coordinates
///
/// # Returns
///
/// A vector of control points with local coordinates at cell centers and
/// geographic coordinates produced by the transform
pub fn sample_control_points<T>(
    width: f64,
    height: f64,
    n: usize,
    transform: &T,
) -> Result<Vec<ControlPoint>, TransformError>
where
    T: ?Sized + GeoTransform,
{
    let mut points = Vec::new();

    // Calculate the number of cells in each dimension
    let num_cells_x = (n as f64 * (width / height)).sqrt().round() as i32;
    let num_cells_y = (n as f64 * (height / width)).sqrt().round() as i32;

    // Calculate the dimensions of each cell
    let cell_width = width / num_cells_x as f64;
    let cell_height = height / num_cells_y as f64;

    // Generate a correspondence at the center of each cell
    for i in 0..num_cells_y {
        for j in 0..num_cells_x {
            let x = (j as f64 + 0.5) * cell_width;
            let y = (i as f64 + 0.5) * cell_height;
            let geographic = transform.forward(&Vector2::new(x, y))?;
            points.push(ControlPoint::new(x, y, geographic.x, geographic.y));
        }
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::AffineModel;
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    #[test]
    fn test_sample_control_points() {
        let width = 800f64;
        let height = 600f64;
        let n = 100;

        let params = DVector::from_vec(vec![0.001, 0.0, 33.0, 0.0, -0.001, 45.0]);
        let model = AffineModel::new(&params).unwrap();

        let points = sample_control_points(width, height, n, &model).unwrap();

        // Test that the number of points is approximately n
        // (It might not be exactly n due to rounding)
        let expected_count = (n as f64 * 0.8) as usize..=(n as f64 * 1.2) as usize;
        assert!(
            expected_count.contains(&points.len()),
            "Expected around {} points, got {}",
            n,
            points.len()
        );

        // Test that all local coordinates are within the frame bounds and
        // the geographic side matches the ground-truth transform
        for point in &points {
            assert!(
                point.x >= 0.0 && point.x < width,
                "Point x-coordinate outside frame bounds: {}",
                point.x
            );
            assert!(
                point.y >= 0.0 && point.y < height,
                "Point y-coordinate outside frame bounds: {}",
                point.y
            );
            assert_relative_eq!(point.lon, 0.001 * point.x + 33.0, epsilon = 1e-12);
            assert_relative_eq!(point.lat, -0.001 * point.y + 45.0, epsilon = 1e-12);
        }
    }
}
