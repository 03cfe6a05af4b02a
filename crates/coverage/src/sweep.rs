use patchsweep_core::{centroid, GeometryError, Point3, PointCloud};
use serde::{Deserialize, Serialize};

use crate::corners::CornerSet;

/// Upper bound on the waypoints of a single path. A pitch that would need
/// more is treated as a runaway parameter, not a request.
pub const MAX_WAYPOINTS: usize = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepParams {
    /// Distance between consecutive rows.
    pub row_pitch: f32,
    /// Evenly spaced waypoints per row, both ends included.
    pub columns_per_row: usize,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            row_pitch: 0.15,
            columns_per_row: 5,
        }
    }
}

impl SweepParams {
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.row_pitch.is_finite() && self.row_pitch > 0.0) {
            return Err(GeometryError::InvalidParameter {
                name: "row_pitch",
                value: self.row_pitch as f64,
            });
        }
        if self.columns_per_row < 2 {
            return Err(GeometryError::InvalidParameter {
                name: "columns_per_row",
                value: self.columns_per_row as f64,
            });
        }
        Ok(())
    }
}

/// Ordered waypoints: a home point followed by rows of equal length.
///
/// Deserialization checks the layout: a path without a home point, or whose
/// length is not `1 + rows * columns`, is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWaypointPath")]
pub struct WaypointPath {
    waypoints: Vec<Point3>,
    rows: usize,
    columns: usize,
}

#[derive(Deserialize)]
struct RawWaypointPath {
    waypoints: Vec<Point3>,
    rows: usize,
    columns: usize,
}

impl TryFrom<RawWaypointPath> for WaypointPath {
    type Error = GeometryError;

    fn try_from(raw: RawWaypointPath) -> Result<Self, Self::Error> {
        let expected = raw
            .rows
            .checked_mul(raw.columns)
            .and_then(|n| n.checked_add(1));
        if expected != Some(raw.waypoints.len()) {
            return Err(GeometryError::MalformedPath {
                waypoints: raw.waypoints.len(),
                rows: raw.rows,
                columns: raw.columns,
            });
        }
        Ok(Self {
            waypoints: raw.waypoints,
            rows: raw.rows,
            columns: raw.columns,
        })
    }
}

impl WaypointPath {
    pub fn new(home: Point3, columns: usize) -> Self {
        Self {
            waypoints: vec![home],
            rows: 0,
            columns,
        }
    }

    /// Append one row.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not have exactly `columns` points.
    pub fn push_row(&mut self, row: &[Point3]) {
        assert_eq!(row.len(), self.columns, "row length must match column count");
        self.waypoints.extend_from_slice(row);
        self.rows += 1;
    }

    pub fn home(&self) -> Point3 {
        self.waypoints[0]
    }

    pub fn waypoints(&self) -> &[Point3] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; every path holds its home point.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The rows in traversal order, home point excluded.
    pub fn rows(&self) -> impl Iterator<Item = &[Point3]> + '_ {
        self.waypoints[1..].chunks_exact(self.columns.max(1))
    }

    /// The full path, home point first, as a cloud.
    pub fn to_cloud(&self) -> PointCloud {
        self.waypoints.iter().copied().collect()
    }
}

/// Corners found on a patch and the path that covers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    /// Rectified corners; `None` when the patch was empty.
    pub corners: Option<CornerSet>,
    pub path: WaypointPath,
}

/// Boustrophedon rows over the rectangle described by `corners`, all at
/// height `z`.
///
/// Row `r` lies `r * row_pitch` below the top edge. Even rows run right to
/// left starting at `right_up`, odd rows left to right starting at
/// `left_up`; column spacing is `(right_up.x - left_up.x) / (columns - 1)`.
/// Generation stops at the first row that is not strictly above the bottom
/// corner on its starting side.
///
/// A rectangle narrower or shorter than one pitch gets no rows at all, even
/// though the stopping rule alone would still emit the top row. The row
/// count therefore goes from 0 just under one pitch to 2 just over it.
///
/// # Errors
///
/// [`GeometryError::InvalidParameter`] for invalid `params`, or when the
/// path would exceed [`MAX_WAYPOINTS`].
pub fn sweep_rows(
    corners: &CornerSet,
    z: f32,
    params: &SweepParams,
) -> Result<Vec<Vec<Point3>>, GeometryError> {
    params.validate()?;

    let pitch = params.row_pitch;
    if !corners.is_finite() || corners.width() < pitch || corners.height() < pitch {
        return Ok(Vec::new());
    }

    let columns = params.columns_per_row;
    let span = (corners.right_up.y() - corners.right_down.y())
        .max(corners.left_up.y() - corners.left_down.y());
    let row_bound = (span as f64 / pitch as f64).ceil() + 1.0;
    if row_bound * columns as f64 + 1.0 > MAX_WAYPOINTS as f64 {
        return Err(GeometryError::InvalidParameter {
            name: "row_pitch",
            value: pitch as f64,
        });
    }

    let step = (corners.right_up.x() - corners.left_up.x()) / (columns - 1) as f32;

    let mut rows = Vec::new();
    for r in 0.. {
        let drop = r as f32 * pitch;
        let (start, bottom, dir) = if r % 2 == 0 {
            (corners.right_up, corners.right_down, -1.0)
        } else {
            (corners.left_up, corners.left_down, 1.0)
        };

        let y = start.y - drop;
        if !(y > bottom.y) {
            break;
        }

        let row = (0..columns)
            .map(|c| Point3::new(start.x + dir * c as f32 * step, y, z))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Plan a coverage path over `patch`.
///
/// The patch centroid anchors corner detection; corners are rectified and
/// swept with [`sweep_rows`] at the centroid's height. The path starts at
/// `home` lowered (or raised) to that height.
///
/// An empty patch is not an error: the plan has no corners and its path is
/// just `home`, unchanged.
pub fn plan_sweep(
    patch: &PointCloud,
    home: Point3,
    params: &SweepParams,
) -> Result<SweepPlan, GeometryError> {
    params.validate()?;

    if patch.is_empty() {
        return Ok(SweepPlan {
            corners: None,
            path: WaypointPath::new(home, params.columns_per_row),
        });
    }

    let center = centroid(patch)?;
    let detected = CornerSet::detect(patch, center);
    let corners = detected.rectified();
    log::debug!("patch centroid {:?}, corners {:?}", center, detected);
    log::debug!("rectified corners {:?}", corners);

    let mut path = WaypointPath::new(home.with_z(center.z()), params.columns_per_row);
    for row in sweep_rows(&corners, center.z(), params)? {
        path.push_row(&row);
    }
    log::debug!("{} rows, {} waypoints", path.row_count(), path.len());

    Ok(SweepPlan {
        corners: Some(corners),
        path,
    })
}
