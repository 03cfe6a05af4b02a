use nalgebra::{Matrix3, Vector3};

use crate::{GeometryError, Point3, PointCloud};

/// Arithmetic mean of all points, accumulated in `f64`.
pub fn centroid(cloud: &PointCloud) -> Result<Point3, GeometryError> {
    if cloud.is_empty() {
        return Err(GeometryError::InsufficientData {
            required: 1,
            found: 0,
        });
    }

    let (mut sx, mut sy, mut sz) = (0.0f64, 0.0f64, 0.0f64);
    for p in cloud.iter_points() {
        sx += p.x as f64;
        sy += p.y as f64;
        sz += p.z as f64;
    }
    let n = cloud.len() as f64;

    Ok(Point3::new((sx / n) as f32, (sy / n) as f32, (sz / n) as f32))
}

/// Scatter matrix of the cloud about `centroid`: the sum of outer products
/// of the centered points. It is not normalised by the point count.
///
/// The result is symmetric positive semi-definite.
pub fn covariance(cloud: &PointCloud, centroid: Point3) -> Matrix3<f64> {
    let c = Vector3::new(centroid.x as f64, centroid.y as f64, centroid.z as f64);

    // Upper triangle only, mirrored at the end
    let mut c00 = 0.0f64;
    let mut c01 = 0.0f64;
    let mut c02 = 0.0f64;
    let mut c11 = 0.0f64;
    let mut c12 = 0.0f64;
    let mut c22 = 0.0f64;
    for p in cloud.iter_points() {
        let dx = p.x as f64 - c.x;
        let dy = p.y as f64 - c.y;
        let dz = p.z as f64 - c.z;
        c00 += dx * dx;
        c01 += dx * dy;
        c02 += dx * dz;
        c11 += dy * dy;
        c12 += dy * dz;
        c22 += dz * dz;
    }

    Matrix3::new(c00, c01, c02, c01, c11, c12, c02, c12, c22)
}

/// Centroid and scatter matrix in one call.
pub fn centroid_and_covariance(
    cloud: &PointCloud,
) -> Result<(Point3, Matrix3<f64>), GeometryError> {
    let c = centroid(cloud)?;
    Ok((c, covariance(cloud, c)))
}
