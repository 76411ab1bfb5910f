//! Accuracy measures for a computed polar decomposition.

use polar_linalg::{Matrix3, Real};

/// Relative reconstruction residual `|A - Q * H|_F / (|A|_F + min_positive)`.
///
/// The smallest positive normal value in the denominator keeps the measure
/// finite for the zero matrix. `A` and `H` are divided by their largest entry
/// before any squaring, so inputs near the overflow threshold stay finite.
pub fn relative_residual<S: Real>(a: &Matrix3<S>, q: &Matrix3<S>, h: &Matrix3<S>) -> S {
    let scale = a.max_abs().max(h.max_abs());
    if scale == S::zero() {
        return S::zero();
    }
    let a = divide(a, scale);
    let h = divide(h, scale);
    let residual = a.subtract(&q.multiply(&h)).norm();
    residual / (a.norm() + S::min_positive_value())
}

/// Departure from orthogonality `|Q^T * Q - I|_F`.
pub fn orthogonality_error<S: Real>(q: &Matrix3<S>) -> S {
    q.transpose_multiply(q)
        .subtract(&Matrix3::identity())
        .norm()
}

/// Departure from symmetry `|H - H^T|_F`.
pub fn symmetry_error<S: Real>(h: &Matrix3<S>) -> S {
    let scale = h.max_abs();
    if scale == S::zero() {
        return S::zero();
    }
    let h = divide(h, scale);
    h.subtract(&h.transpose()).norm() * scale
}

/// Relative error of a computed orthogonal factor against a known one,
/// `|Q - Q_exp|_F / (|Q_exp|_F * condition)`.
///
/// A backward-stable algorithm keeps this close to machine epsilon no matter
/// how ill-conditioned `A` is.
///
/// # Arguments
///
/// * `q` - The computed orthogonal factor.
/// * `expected` - The exact orthogonal factor.
/// * `condition` - The condition number the raw error is scaled by.
pub fn scaled_orthogonal_error<S: Real>(
    q: &Matrix3<S>,
    expected: &Matrix3<S>,
    condition: S,
) -> S {
    q.subtract(expected).norm() / (expected.norm() * condition)
}

fn divide<S: Real>(m: &Matrix3<S>, scale: S) -> Matrix3<S> {
    Matrix3::from_fn(|row, col| m[(row, col)] / scale)
}
