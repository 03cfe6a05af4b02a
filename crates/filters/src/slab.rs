use patchsweep_core::{Point3, PointCloud};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Clouds at least this large are classified on the rayon pool.
const PARALLEL_MIN_POINTS: usize = 10_000;

/// How xy-proximity to the reference is measured inside the secondary band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialMetric {
    /// `|dx| + |dy|`
    #[default]
    Manhattan,
    /// `sqrt(dx^2 + dy^2)`
    Euclidean,
}

impl RadialMetric {
    #[inline]
    pub fn distance(self, a: &Point3, b: &Point3) -> f32 {
        match self {
            RadialMetric::Manhattan => a.manhattan_xy(b),
            RadialMetric::Euclidean => a.distance_xy(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlabParams {
    /// Half-thickness of the slab around the reference height. Also the
    /// half-thickness of the secondary band.
    pub plane_tolerance: f32,
    /// Height of the secondary band in which points must also be close to
    /// the reference in xy.
    pub band_z: f32,
    /// Largest xy distance from the reference accepted inside the band.
    pub radial_tolerance: f32,
    pub radial_metric: RadialMetric,
}

impl Default for SlabParams {
    fn default() -> Self {
        Self {
            plane_tolerance: 0.01,
            band_z: 0.075,
            radial_tolerance: 0.15,
            radial_metric: RadialMetric::Manhattan,
        }
    }
}

impl SlabParams {
    /// Whether `p` survives the slab test around `reference`.
    #[inline]
    pub fn retains(&self, p: &Point3, reference: &Point3) -> bool {
        if !p.is_finite() {
            return false;
        }

        let tol = self.plane_tolerance;
        let dz = (p.z - reference.z).abs();
        if dz.is_nan() || dz > tol {
            return false;
        }

        let in_band = p.z >= self.band_z - tol && p.z <= self.band_z + tol;
        !in_band || self.radial_metric.distance(p, reference) <= self.radial_tolerance
    }
}

/// Extract the points of `cloud` lying in a horizontal slab around
/// `reference.z`.
///
/// Points that also fall in the band around `params.band_z` are kept only
/// when they are within `params.radial_tolerance` of `reference` in xy.
/// Non-finite points are dropped. The result keeps the input order and may
/// be empty.
pub fn slab_filter(cloud: &PointCloud, reference: Point3, params: &SlabParams) -> PointCloud {
    if cloud.is_empty() {
        return PointCloud::new();
    }

    let n = cloud.len();
    let keep: Vec<usize> = if n >= PARALLEL_MIN_POINTS {
        (0..n)
            .into_par_iter()
            .filter(|&i| params.retains(&cloud.point(i), &reference))
            .collect()
    } else {
        (0..n)
            .filter(|&i| params.retains(&cloud.point(i), &reference))
            .collect()
    };

    log::debug!(
        "slab filter around z = {} kept {} of {} points",
        reference.z,
        keep.len(),
        n
    );

    cloud.select(&keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const REF: Point3 = Point3::new(0.0, 0.0, 0.075);

    fn sample_cloud() -> PointCloud {
        PointCloud::from_xyz(
            vec![0.0, 0.1, 0.5, 0.05, 0.3, 0.0],
            vec![0.0, 0.04, 0.5, 0.05, 0.0, 0.0],
            vec![0.075, 0.08, 0.075, 0.07, 0.2, -0.3],
        )
    }

    #[test]
    fn keeps_near_points_in_band() {
        let out = slab_filter(&sample_cloud(), REF, &SlabParams::default());
        // (0.5, 0.5) is inside the slab and band but 1.0 away in L1;
        // the last two are outside the slab
        assert_eq!(out.x, vec![0.0, 0.1, 0.05]);
        assert_eq!(out.z, vec![0.075, 0.08, 0.07]);
    }

    #[test]
    fn points_outside_band_are_kept_unconditionally() {
        let reference = Point3::new(0.0, 0.0, 0.5);
        let cloud = PointCloud::from_xyz(
            vec![0.0, 9.0, -4.0],
            vec![0.0, 9.0, 3.0],
            vec![0.5, 0.505, 0.495],
        );
        let out = slab_filter(&cloud, reference, &SlabParams::default());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn slab_bounds_are_inclusive() {
        let params = SlabParams {
            plane_tolerance: 0.25,
            band_z: 10.0,
            ..SlabParams::default()
        };
        let reference = Point3::new(0.0, 0.0, 1.0);
        let cloud = PointCloud::from_xyz(vec![0.0; 4], vec![0.0; 4], vec![0.75, 1.25, 0.7, 1.3]);
        let out = slab_filter(&cloud, reference, &params);
        assert_eq!(out.z, vec![0.75, 1.25]);
    }

    #[test]
    fn manhattan_is_stricter_than_euclidean_on_diagonals() {
        // 0.1 along each axis: L1 = 0.2, L2 ~= 0.141
        let cloud = PointCloud::from_xyz(vec![0.1], vec![0.1], vec![0.075]);

        let l1 = slab_filter(&cloud, REF, &SlabParams::default());
        assert!(l1.is_empty());

        let l2 = slab_filter(
            &cloud,
            REF,
            &SlabParams {
                radial_metric: RadialMetric::Euclidean,
                ..SlabParams::default()
            },
        );
        assert_eq!(l2.len(), 1);
    }

    #[test]
    fn metrics_agree_on_axis() {
        let cloud = PointCloud::from_xyz(vec![0.15, 0.16], vec![0.0, 0.0], vec![0.075, 0.075]);
        for metric in [RadialMetric::Manhattan, RadialMetric::Euclidean] {
            let params = SlabParams {
                radial_metric: metric,
                ..SlabParams::default()
            };
            let out = slab_filter(&cloud, REF, &params);
            assert_eq!(out.x, vec![0.15], "{metric:?}");
        }
    }

    #[test]
    fn empty_cloud_gives_empty_patch() {
        let out = slab_filter(&PointCloud::new(), REF, &SlabParams::default());
        assert!(out.is_empty());
    }

    #[test]
    fn nothing_in_slab_gives_empty_patch() {
        let cloud = PointCloud::from_xyz(vec![0.0, 1.0], vec![0.0, 1.0], vec![1.0, 2.0]);
        let out = slab_filter(&cloud, REF, &SlabParams::default());
        assert!(out.is_empty());
    }

    #[test]
    fn non_finite_points_dropped() {
        let reference = Point3::new(0.0, 0.0, 0.5);
        let cloud = PointCloud::from_xyz(
            vec![f32::NAN, 1.0, f32::INFINITY, 2.0],
            vec![0.0, f32::NAN, 0.0, 0.0],
            vec![0.5, 0.5, 0.5, 0.5],
        );
        let out = slab_filter(&cloud, reference, &SlabParams::default());
        assert_eq!(out.x, vec![2.0]);
    }

    #[test]
    fn parallel_path_preserves_order() {
        let n = PARALLEL_MIN_POINTS * 2 + 17;
        let reference = Point3::new(0.0, 0.0, 0.0);
        let cloud = PointCloud::from_xyz(
            (0..n).map(|i| i as f32).collect(),
            vec![0.0; n],
            (0..n).map(|i| if i % 3 == 0 { 0.0 } else { 1.0 }).collect(),
        );
        let out = slab_filter(&cloud, reference, &SlabParams::default());
        assert_eq!(out.len(), (n + 2) / 3);
        for w in out.x.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    proptest! {
        #[test]
        fn retained_points_satisfy_slab_and_band(
            pts in prop::collection::vec(
                (-0.5f32..0.5, -0.5f32..0.5, 0.0f32..0.15),
                0..400
            ),
            rx in -0.2f32..0.2,
            ry in -0.2f32..0.2,
            rz in 0.06f32..0.09,
        ) {
            let params = SlabParams::default();
            let reference = Point3::new(rx, ry, rz);
            let cloud: PointCloud = pts.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect();
            let out = slab_filter(&cloud, reference, &params);

            prop_assert!(out.len() <= cloud.len());
            for p in out.iter_points() {
                prop_assert!((p.z - rz).abs() <= params.plane_tolerance + 1e-6);
                if (p.z - params.band_z).abs() <= params.plane_tolerance - 1e-6 {
                    prop_assert!(p.manhattan_xy(&reference) <= params.radial_tolerance);
                }
            }
        }
    }
}
