use nalgebra::{Matrix3, Vector3};
use patchsweep_core::{centroid_and_covariance, GeometryError, Point3, PointCloud};
use serde::Serialize;

/// Fewest points that can define a plane.
pub const MIN_PLANE_POINTS: usize = 3;

/// A covariance whose middle eigenvalue is at most this fraction of the
/// largest has rank < 2: the points are collinear or coincident.
pub const DEGENERACY_RATIO: f64 = 1e-9;

/// A plane `normal . p = offset` fitted to a patch by PCA.
///
/// `offset` is always derived from `normal` and `centroid`; there is no way
/// to set it independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaneModel {
    normal: [f32; 3],
    offset: f32,
    centroid: Point3,
    major_axis: [f32; 3],
    eigenvalues: [f64; 3],
}

impl PlaneModel {
    fn new(
        normal: [f32; 3],
        centroid: Point3,
        major_axis: [f32; 3],
        eigenvalues: [f64; 3],
    ) -> Self {
        Self {
            normal,
            offset: centroid.dot(&normal),
            centroid,
            major_axis,
            eigenvalues,
        }
    }

    /// Unit normal; the eigenvector of the smallest covariance eigenvalue.
    pub fn normal(&self) -> [f32; 3] {
        self.normal
    }

    /// `normal . centroid`.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Mean of the fitted points.
    pub fn centroid(&self) -> Point3 {
        self.centroid
    }

    /// Unit in-plane direction of greatest spread.
    pub fn major_axis(&self) -> [f32; 3] {
        self.major_axis
    }

    /// Covariance eigenvalues, ascending.
    pub fn eigenvalues(&self) -> [f64; 3] {
        self.eigenvalues
    }

    /// Signed distance along the normal, positive on the side it points to.
    #[inline]
    pub fn signed_distance(&self, point: Point3) -> f32 {
        point.dot(&self.normal) - self.offset
    }

    #[inline]
    pub fn distance_to_point(&self, point: Point3) -> f32 {
        self.signed_distance(point).abs()
    }

    /// The same plane with its normal flipped, if needed, so that
    /// `viewpoint` lies on the positive side.
    pub fn oriented_toward(self, viewpoint: Point3) -> Self {
        if self.signed_distance(viewpoint) >= 0.0 {
            return self;
        }
        let n = self.normal;
        Self::new(
            [-n[0], -n[1], -n[2]],
            self.centroid,
            self.major_axis,
            self.eigenvalues,
        )
    }
}

/// Fit a plane to `cloud` by principal-component analysis.
///
/// The normal is the eigenvector of the smallest covariance eigenvalue and
/// the major axis that of the largest. Eigenpairs are scanned in solver
/// order and a later pair only wins on a strictly smaller (or larger)
/// eigenvalue, so ties resolve to the lowest index.
///
/// # Errors
///
/// * [`GeometryError::InsufficientData`] for fewer than three points.
/// * [`GeometryError::DegeneratePlane`] when the points are collinear or
///   coincident and no unique normal exists.
pub fn fit_plane(cloud: &PointCloud) -> Result<PlaneModel, GeometryError> {
    if cloud.len() < MIN_PLANE_POINTS {
        return Err(GeometryError::InsufficientData {
            required: MIN_PLANE_POINTS,
            found: cloud.len(),
        });
    }

    let (centroid, cov) = centroid_and_covariance(cloud)?;
    let eigen = cov.symmetric_eigen();
    let evals = [eigen.eigenvalues[0], eigen.eigenvalues[1], eigen.eigenvalues[2]];

    let mut sorted = evals;
    sorted.sort_by(f64::total_cmp);
    check_rank(&cov, sorted)?;

    let (i_normal, i_major) = select_axes(&evals);
    let normal = unit_f32(eigen.eigenvectors.column(i_normal).into_owned());
    let major_axis = unit_f32(eigen.eigenvectors.column(i_major).into_owned());

    log::debug!(
        "plane fit over {} points: centroid {:?}, eigenvalues {:?}, \
         normal {:?} (index {}), major axis {:?} (index {})",
        cloud.len(),
        centroid,
        evals,
        normal,
        i_normal,
        major_axis,
        i_major
    );

    Ok(PlaneModel::new(normal, centroid, major_axis, sorted))
}

/// Indices of the minimum and maximum eigenvalue, first occurrence on ties.
fn select_axes(evals: &[f64; 3]) -> (usize, usize) {
    let mut i_min = 0;
    let mut i_max = 0;
    for i in 1..3 {
        if evals[i] < evals[i_min] {
            i_min = i;
        }
        if evals[i] > evals[i_max] {
            i_max = i;
        }
    }
    (i_min, i_max)
}

fn check_rank(cov: &Matrix3<f64>, sorted: [f64; 3]) -> Result<(), GeometryError> {
    let largest = sorted[2];
    let degenerate = !cov.iter().all(|v| v.is_finite())
        || largest <= f64::EPSILON * cov.amax().max(1.0)
        || sorted[1] <= DEGENERACY_RATIO * largest;

    if degenerate {
        return Err(GeometryError::DegeneratePlane {
            eigenvalues: sorted,
        });
    }
    Ok(())
}

fn unit_f32(v: Vector3<f64>) -> [f32; 3] {
    let v = v.normalize();
    [v.x as f32, v.y as f32, v.z as f32]
}
