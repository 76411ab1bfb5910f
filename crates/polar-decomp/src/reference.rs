//! Reference matrices with known polar factors, from Higham (1986).
//!
//! All arrays are column-major, `index = row + 3 * column`.

use polar_linalg::{Matrix3, Real};

/// Higham's 3x3 example. Its determinant is negative, so the orthogonal factor
/// is a reflection.
pub const HIGHAM_EXAMPLE: [f64; 9] = [0.1, 0.1, 0.3, 0.2, 0.1, 0.2, 0.3, 0.0, 0.1];

/// Exact orthogonal factor of every [`near_singular_matrix`].
pub const NEAR_SINGULAR_Q: [f64; 9] = [
    139.0 / 255.0,
    466.0 / 1275.0,
    962.0 / 1275.0,
    -14.0 / 51.0,
    -197.0 / 255.0,
    146.0 / 255.0,
    202.0 / 255.0,
    -662.0 / 1275.0,
    -409.0 / 1275.0,
];

/// Values of `y` the near-singular family is usually evaluated at.
pub const NEAR_SINGULAR_PARAMETERS: [f64; 7] = [1.0, 1e-4, 1e-8, 1e-10, 1e-12, 1e-14, 1e-16];

/// Matrix with orthogonal factor [`NEAR_SINGULAR_Q`] whose two smallest
/// singular values shrink with `y`; rank one in the limit `y -> 0`.
pub fn near_singular_matrix(y: f64) -> [f64; 9] {
    [
        (720.0 * y - 25.0) / 1275.0,
        (396.0 * y + 70.0) / 1275.0,
        (972.0 * y - 10.0) / 1275.0,
        (-650.0 * y + 300.0) / 1275.0,
        (-145.0 * y - 840.0) / 1275.0,
        (610.0 * y + 120.0) / 1275.0,
        (710.0 * y + 300.0) / 1275.0,
        (178.0 * y - 840.0) / 1275.0,
        (-529.0 * y + 120.0) / 1275.0,
    ]
}

/// Condition number of the orthogonal factor of [`near_singular_matrix`].
pub fn near_singular_condition(y: f64) -> f64 {
    ((1.0 + 2.0 * y * y) / (3.0 * y * y)).sqrt()
}

/// Converts a column-major `f64` array to a matrix of the requested precision.
pub fn to_matrix<S: Real>(values: &[f64; 9]) -> Matrix3<S> {
    Matrix3::from_fn(|row, col| S::from_f64(values[row + 3 * col]))
}
