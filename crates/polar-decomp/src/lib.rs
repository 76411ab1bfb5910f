#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Accuracy measures for computed factors.
pub mod metrics;

/// Scaled Newton polar iteration.
pub mod polar;

/// Matrices with known factors for tests, demos and benchmarks.
pub mod reference;

pub use crate::polar::{
    polar_decomposition, polar_decomposition_into, polar_decomposition_with_params,
    PolarDecomposition, PolarParams,
};

pub use polar_linalg::{Matrix3, Real};
