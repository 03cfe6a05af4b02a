/// Failures of the geometric pipeline.
///
/// Empty intermediate results (an empty slab, a patch with no rows) are
/// ordinary values, never errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("need at least {required} points, got {found}")]
    InsufficientData { required: usize, found: usize },
    #[error("points do not span a plane (covariance eigenvalues {eigenvalues:?})")]
    DegeneratePlane { eigenvalues: [f64; 3] },
    #[error("invalid parameter `{name}` = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("{waypoints} waypoints cannot hold a home point and {rows} rows of {columns}")]
    MalformedPath {
        waypoints: usize,
        rows: usize,
        columns: usize,
    },
}
