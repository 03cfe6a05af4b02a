#![forbid(unsafe_code)]

pub mod corners;
pub mod sweep;

pub use corners::{CornerSet, RECTIFY_SNAP};
pub use sweep::{plan_sweep, sweep_rows, SweepParams, SweepPlan, WaypointPath, MAX_WAYPOINTS};
