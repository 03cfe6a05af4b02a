//! Planar patch analysis for depth-sensor point clouds: fit a plane to a
//! user selection, extract the surrounding patch from the scene, and plan a
//! boustrophedon path that covers it.
//!
//! The building blocks live in their own crates and are re-exported here.
#![forbid(unsafe_code)]

pub mod pipeline;

pub use patchsweep_coverage as coverage;
pub use patchsweep_filters as filters;
pub use patchsweep_segmentation as segmentation;

pub use patchsweep_core::{
    centroid, centroid_and_covariance, covariance, transform_cloud, GeometryError, Point3,
    PointCloud, RigidTransform,
};
pub use pipeline::{analyze_selection, analyze_selection_in_frame, PatchAnalysis, PatchParams};
