#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for matrix operations.
pub mod error;

/// Fixed-size 3x3 matrix type and arithmetic.
pub mod matrix;

/// Precision-polymorphic scalar utilities.
pub mod scalar;

pub use crate::error::LinalgError;
pub use crate::matrix::Matrix3;
pub use crate::scalar::Real;

/// Type alias for a single precision 3x3 matrix.
pub type Matrix3F32 = Matrix3<f32>;

/// Type alias for a double precision 3x3 matrix.
pub type Matrix3F64 = Matrix3<f64>;
