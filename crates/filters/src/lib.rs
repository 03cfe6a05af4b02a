#![forbid(unsafe_code)]

pub mod slab;

pub use slab::{slab_filter, RadialMetric, SlabParams};
