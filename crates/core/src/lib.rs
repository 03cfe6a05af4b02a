#![forbid(unsafe_code)]

pub mod cloud;
pub mod error;
pub mod point;
pub mod stats;
pub mod transform;

pub use cloud::PointCloud;
pub use error::GeometryError;
pub use point::Point3;
pub use stats::{centroid, centroid_and_covariance, covariance};
pub use transform::{transform_cloud, RigidTransform};
