use thiserror::Error;

/// An error type for 3x3 matrix operations.
#[derive(Error, Debug, PartialEq)]
pub enum LinalgError {
    /// The matrix cannot be inverted.
    #[error("Singular matrix. The determinant {determinant:e} is within tolerance of zero.")]
    SingularMatrix {
        /// Determinant of the rejected matrix, widened to `f64`.
        determinant: f64,
    },
}
