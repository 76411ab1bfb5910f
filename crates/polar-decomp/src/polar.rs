//! Polar decomposition `A = Q * H` by the scaled Newton iteration.
//!
//! The orthogonal factor is the limit of
//!
//! ```text
//! X_0     = A
//! X_{k+1} = (gamma_k * X_k + X_k^{-T} / gamma_k) / 2,   gamma_k = sqrt(|X_k^{-T}|_F / |X_k|_F)
//! ```
//!
//! and the stretch factor is the symmetric part of `Q^T * A`. The scaling
//! `gamma_k` balances both terms of the average, which is what makes the
//! iteration converge in a handful of steps even when `A` is close to
//! singular.
//!
//! Reference: N. J. Higham, "Computing the polar decomposition, with
//! applications", SIAM J. Sci. Stat. Comput. 7(4), 1986.

use polar_linalg::{LinalgError, Matrix3, Real};

/// Default cap on the number of Newton steps.
const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Parameters controlling the polar iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarParams<S> {
    /// Maximum number of Newton steps. Reaching it is not an error.
    pub max_iterations: usize,
    /// Convergence threshold on `|X_{k+1} - X_k|_F / |X_k|_F`.
    pub tolerance: S,
}

impl<S: Real> Default for PolarParams<S> {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            // the iteration converges quadratically, so the accepted iterate
            // is accurate to roughly tolerance^2
            tolerance: S::epsilon().sqrt(),
        }
    }
}

impl<S: Real> PolarParams<S> {
    /// Create default iteration parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the relative convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: S) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Result of a polar decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarDecomposition<S> {
    /// Orthogonal factor, the rotation or reflection closest to `A`.
    pub q: Matrix3<S>,
    /// Symmetric positive semi-definite stretch factor.
    pub h: Matrix3<S>,
    /// Number of Newton steps taken.
    pub num_iterations: usize,
    /// Whether the relative step fell below the tolerance before the cap.
    pub converged: bool,
}

/// Computes the polar decomposition `A = Q * H` with default parameters.
///
/// The function is total: every finite input yields a result. The zero
/// matrix decomposes into `Q = I`, `H = 0`.
///
/// # Arguments
///
/// * `a` - The matrix to decompose.
///
/// Example:
///
/// ```
/// use polar_decomp::polar_decomposition;
/// use polar_linalg::Matrix3;
///
/// let a: Matrix3<f64> = Matrix3::from_rows([[0.0, -2.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 3.0]]);
/// let polar = polar_decomposition(&a);
/// assert!((polar.q[(1, 0)] - 1.0).abs() < 1e-12);
/// assert!((polar.h[(2, 2)] - 3.0).abs() < 1e-12);
/// ```
pub fn polar_decomposition<S: Real>(a: &Matrix3<S>) -> PolarDecomposition<S> {
    polar_decomposition_with_params(a, &PolarParams::default())
}

/// Computes the polar decomposition `A = Q * H` with explicit parameters.
///
/// With `max_iterations == 0` no Newton step is taken and `q` holds the
/// rescaled starting iterate.
pub fn polar_decomposition_with_params<S: Real>(
    a: &Matrix3<S>,
    params: &PolarParams<S>,
) -> PolarDecomposition<S> {
    debug_assert!(a.is_finite(), "polar decomposition input must be finite");

    let scale = a.max_abs();
    if scale == S::zero() {
        log::debug!("Zero input matrix, returning the identity as orthogonal factor");
        return PolarDecomposition {
            q: Matrix3::identity(),
            h: Matrix3::zeros(),
            num_iterations: 0,
            converged: true,
        };
    }

    // Q is invariant under positive scaling of A
    let mut x = starting_iterate(&Matrix3::from_fn(|row, col| a[(row, col)] / scale));

    let mut num_iterations = 0;
    let mut converged = false;
    while num_iterations < params.max_iterations {
        let (next, gamma) = match newton_step(&x) {
            Ok(step) => step,
            Err(err) => {
                log::warn!("Polar iteration stopped after {num_iterations} steps: {err}");
                break;
            }
        };
        num_iterations += 1;

        let step = next.subtract(&x).norm();
        let threshold = params.tolerance * x.norm();
        x = next;

        log::trace!("Polar iteration {num_iterations}: gamma = {gamma:?}, step = {step:?}");

        if step <= threshold {
            converged = true;
            break;
        }
    }

    if converged {
        log::debug!("Polar iteration converged after {num_iterations} steps");
    } else {
        log::debug!(
            "Polar iteration not converged after {num_iterations} steps, returning last iterate"
        );
    }

    PolarDecomposition {
        q: x,
        h: stretch_factor(&x, a),
        num_iterations,
        converged,
    }
}

/// Polar decomposition over column-major 9-element buffers.
///
/// All three buffers share the scalar type `S` and the layout
/// `index = row + 3 * column`.
///
/// # Arguments
///
/// * `q` - Output buffer for the orthogonal factor.
/// * `h` - Output buffer for the symmetric stretch factor.
/// * `a` - The matrix to decompose.
///
/// Example:
///
/// ```
/// use polar_decomp::polar_decomposition_into;
///
/// let a = [2.0_f32, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0];
/// let mut q = [0.0; 9];
/// let mut h = [0.0; 9];
/// polar_decomposition_into(&mut q, &mut h, &a);
/// assert!((h[4] - 3.0).abs() < 1e-5);
/// ```
pub fn polar_decomposition_into<S: Real>(q: &mut [S; 9], h: &mut [S; 9], a: &[S; 9]) {
    let polar = polar_decomposition(&Matrix3::from_cols_array(a));
    *q = polar.q.to_cols_array();
    *h = polar.h.to_cols_array();
}

/// One scaled Newton step. Returns the next iterate and the scaling factor.
fn newton_step<S: Real>(x: &Matrix3<S>) -> Result<(Matrix3<S>, S), LinalgError> {
    // Y = X^{-T}
    let y = x.inverse()?.transpose();
    let gamma = (y.norm() / x.norm()).sqrt();
    let next = (x.scale(gamma) + y.scale(gamma.recip())).scale(S::half());
    Ok((next, gamma))
}

/// Symmetric stretch factor `H = sym(Q^T * A)`.
fn stretch_factor<S: Real>(q: &Matrix3<S>, a: &Matrix3<S>) -> Matrix3<S> {
    q.transpose_multiply(a).symmetric_part()
}

/// Builds an invertible first iterate with the same orthogonal factor as `x`.
///
/// `x` is expected to have entries of magnitude at most one. A start whose
/// cofactors rise above rounding noise is only rescaled to unit determinant.
/// Numerically rank-deficient starts get their null space filled in, which
/// leaves the action of `x` on its range untouched.
fn starting_iterate<S: Real>(x: &Matrix3<S>) -> Matrix3<S> {
    let cofactor = x.cofactor();
    let norm = x.norm();

    if cofactor.norm() > S::tolerance() * norm * norm {
        if let Some(start) = unit_determinant(x) {
            return start;
        }
        // rank two: cof(X) spans the outer product of the left and right null
        // vectors, oriented so that adding it raises the determinant
        let completed = *x + cofactor.scale(norm.recip());
        if let Some(start) = unit_determinant(&completed) {
            log::debug!("Rank-two input completed along its cofactor matrix");
            return start;
        }
    }

    if let Some(start) = complete_rank_one(x) {
        log::debug!("Rank-one input completed with an orthonormal basis");
        return start;
    }

    log::debug!("Could not complete the input, starting from the identity");
    Matrix3::identity()
}

/// Rescales `x` to unit absolute determinant, so that its inverse passes the
/// singularity check.
///
/// The factor is capped at `1 / tolerance` to keep the cofactor products
/// finite; `None` if `x` is singular or the rescaled matrix still is.
fn unit_determinant<S: Real>(x: &Matrix3<S>) -> Option<Matrix3<S>> {
    let tolerance = S::tolerance();
    let det = x.determinant();
    if det == S::zero() || !det.is_finite() {
        return None;
    }
    let factor = det.abs().cbrt().recip().min(tolerance.recip());
    let scaled = x.scale(factor);
    (scaled.determinant().abs() > tolerance).then_some(scaled)
}

/// Completes `x ~ s * u * v^T` to `x + s * (u2 * v2^T + u3 * v3^T)`, where
/// `(u, u2, u3)` and `(v, v2, v3)` are right-handed orthonormal bases.
///
/// `u` is the direction of the largest column and `v` the direction of
/// `x^T * u`. `None` for the zero matrix.
fn complete_rank_one<S: Real>(x: &Matrix3<S>) -> Option<Matrix3<S>> {
    let columns: [[S; 3]; 3] =
        std::array::from_fn(|col| [x[(0, col)], x[(1, col)], x[(2, col)]]);
    let largest = columns
        .iter()
        .copied()
        .reduce(|best, column| if norm3(&column) > norm3(&best) { column } else { best })?;
    let u = normalize3(&largest)?;

    let w = columns.map(|column| dot3(&column, &u));
    let magnitude = norm3(&w);
    let v = normalize3(&w)?;

    let (u2, u3) = complete_basis(&u)?;
    let (v2, v3) = complete_basis(&v)?;

    Some(Matrix3::from_fn(|row, col| {
        x[(row, col)] + magnitude * (u2[row] * v2[col] + u3[row] * v3[col])
    }))
}

/// Two unit vectors completing the unit vector `u` to a right-handed basis.
fn complete_basis<S: Real>(u: &[S; 3]) -> Option<([S; 3], [S; 3])> {
    // cross with the axis least aligned with u
    let mut axis = 0;
    for i in 1..3 {
        if u[i].abs() < u[axis].abs() {
            axis = i;
        }
    }
    let mut e = [S::zero(); 3];
    e[axis] = S::one();

    let u2 = normalize3(&cross3(u, &e))?;
    let u3 = cross3(u, &u2);
    Some((u2, u3))
}

fn dot3<S: Real>(a: &[S; 3], b: &[S; 3]) -> S {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm3<S: Real>(a: &[S; 3]) -> S {
    dot3(a, a).sqrt()
}

fn normalize3<S: Real>(a: &[S; 3]) -> Option<[S; 3]> {
    let norm = norm3(a);
    (norm > S::zero()).then(|| a.map(|v| v / norm))
}

fn cross3<S: Real>(a: &[S; 3], b: &[S; 3]) -> [S; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
