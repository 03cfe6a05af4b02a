#![forbid(unsafe_code)]

pub mod pca_plane;

pub use pca_plane::{fit_plane, PlaneModel, DEGENERACY_RATIO, MIN_PLANE_POINTS};
