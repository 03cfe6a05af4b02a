use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{Point3, PointCloud};

/// Rotation followed by translation, mapping sensor-frame points into the
/// frame the analysis runs in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Row-major rotation matrix.
    pub rotation: [[f32; 3]; 3],
    pub translation: [f32; 3],
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0, 0.0, 0.0],
        }
    }

    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Rotation by `angle` radians about +z, then `translation`.
    pub fn from_yaw(angle: f32, translation: [f32; 3]) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rotation: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
            translation,
        }
    }

    /// `R * p + t`
    pub fn apply_to_point(&self, p: Point3) -> Point3 {
        let r = &self.rotation;
        let t = &self.translation;
        Point3::new(
            r[0][0] * p.x + r[0][1] * p.y + r[0][2] * p.z + t[0],
            r[1][0] * p.x + r[1][1] * p.y + r[1][2] * p.z + t[1],
            r[2][0] * p.x + r[2][1] * p.y + r[2][2] * p.z + t[2],
        )
    }

    /// The transform that applies `self`, then `other`.
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        let first = rotation_matrix(&self.rotation);
        let second = rotation_matrix(&other.rotation);

        let rotation = second * first;
        let translation =
            second * Vector3::from(self.translation) + Vector3::from(other.translation);

        RigidTransform {
            rotation: std::array::from_fn(|i| std::array::from_fn(|j| rotation[(i, j)])),
            translation: translation.into(),
        }
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Map every point of `cloud` through `transform`, returning a new cloud in
/// the same order.
pub fn transform_cloud(cloud: &PointCloud, transform: &RigidTransform) -> PointCloud {
    cloud
        .iter_points()
        .map(|p| transform.apply_to_point(p))
        .collect()
}

fn rotation_matrix(r: &[[f32; 3]; 3]) -> Matrix3<f32> {
    Matrix3::from_fn(|i, j| r[i][j])
}
