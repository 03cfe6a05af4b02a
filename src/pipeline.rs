//! One call from a user selection to a coverage path.

use patchsweep_core::{transform_cloud, GeometryError, PointCloud, RigidTransform};
use patchsweep_coverage::{plan_sweep, CornerSet, SweepParams, WaypointPath};
use patchsweep_filters::{slab_filter, SlabParams};
use patchsweep_segmentation::{fit_plane, PlaneModel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchParams {
    pub slab: SlabParams,
    pub sweep: SweepParams,
}

/// Everything derived from one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchAnalysis {
    /// Plane fitted to the selection.
    pub plane: PlaneModel,
    /// Scene points in the slab around the selection.
    pub patch: PointCloud,
    /// Rectified patch corners; `None` when the patch is empty.
    pub corners: Option<CornerSet>,
    pub path: WaypointPath,
}

/// Fit a plane to `selection`, cut the matching patch out of `scene` and
/// plan a sweep over it.
///
/// The selection centroid is both the slab reference and the home point of
/// the path. Fails if the selection cannot define a plane or if the sweep
/// parameters are invalid; an empty patch is not a failure.
pub fn analyze_selection(
    scene: &PointCloud,
    selection: &PointCloud,
    params: &PatchParams,
) -> Result<PatchAnalysis, GeometryError> {
    params.sweep.validate()?;

    let plane = fit_plane(selection)?;
    let home = plane.centroid();

    let patch = slab_filter(scene, home, &params.slab);
    let plan = plan_sweep(&patch, home, &params.sweep)?;

    if plan.path.row_count() == 0 {
        log::warn!(
            "patch of {} points around {:?} is too small for a {} pitch, path has no rows",
            patch.len(),
            home,
            params.sweep.row_pitch
        );
    }
    log::info!(
        "selection of {} points: normal {:?}, patch {} of {} scene points, {} rows, {} waypoints",
        selection.len(),
        plane.normal(),
        patch.len(),
        scene.len(),
        plan.path.row_count(),
        plan.path.len()
    );

    Ok(PatchAnalysis {
        plane,
        patch,
        corners: plan.corners,
        path: plan.path,
    })
}

/// [`analyze_selection`] after mapping both clouds through
/// `sensor_to_target`. All outputs are in the target frame.
pub fn analyze_selection_in_frame(
    scene: &PointCloud,
    selection: &PointCloud,
    sensor_to_target: &RigidTransform,
    params: &PatchParams,
) -> Result<PatchAnalysis, GeometryError> {
    let scene = transform_cloud(scene, sensor_to_target);
    let selection = transform_cloud(selection, sensor_to_target);
    analyze_selection(&scene, &selection, params)
}
