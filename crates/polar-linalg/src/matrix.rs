//! Fixed-size 3x3 matrix stored in column-major order.
//!
//! The storage order matches the flat buffers exchanged with callers: flat
//! component `i` holds row `i % 3` of column `i / 3`.

use std::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::{LinalgError, Real};

/// A 3x3 matrix over a floating-point scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3<S> {
    data: [S; 9],
}

impl<S: Real> Matrix3<S> {
    /// Create a new matrix from a column-major array.
    ///
    /// Example:
    ///
    /// ```
    /// use polar_linalg::Matrix3;
    ///
    /// let m = Matrix3::from_cols_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    /// assert_eq!(m[(1, 0)], 2.0);
    /// assert_eq!(m[(0, 1)], 4.0);
    /// ```
    #[inline]
    pub fn from_cols_array(arr: &[S; 9]) -> Self {
        Self { data: *arr }
    }

    /// Create a new matrix from rows, as matrices are usually written down.
    pub fn from_rows(rows: [[S; 3]; 3]) -> Self {
        Self::from_fn(|row, col| rows[row][col])
    }

    /// Create a matrix by evaluating `f(row, col)` for every component.
    pub fn from_fn(f: impl Fn(usize, usize) -> S) -> Self {
        let mut data = [S::zero(); 9];
        for col in 0..3 {
            for row in 0..3 {
                data[row + 3 * col] = f(row, col);
            }
        }
        Self { data }
    }

    /// The zero matrix.
    #[inline]
    pub fn zeros() -> Self {
        Self {
            data: [S::zero(); 9],
        }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        let mut m = Self::zeros();
        m.data[0] = S::one();
        m.data[4] = S::one();
        m.data[8] = S::one();
        m
    }

    /// Column-major copy of the components.
    #[inline]
    pub fn to_cols_array(&self) -> [S; 9] {
        self.data
    }

    /// Column-major view of the components.
    #[inline]
    pub fn as_slice(&self) -> &[S] {
        &self.data
    }

    /// Component at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> S {
        self[(row, col)]
    }

    /// Transpose the matrix.
    pub fn transpose(&self) -> Self {
        Self::from_fn(|row, col| self[(col, row)])
    }

    /// Matrix product `self * rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        Self::from_fn(|row, col| {
            self[(row, 0)] * rhs[(0, col)]
                + self[(row, 1)] * rhs[(1, col)]
                + self[(row, 2)] * rhs[(2, col)]
        })
    }

    /// Matrix product `self^T * rhs` without forming the transpose.
    ///
    /// Component `(row, col)` is the dot product of column `row` of `self`
    /// with column `col` of `rhs`, both contiguous in column-major storage.
    pub fn transpose_multiply(&self, rhs: &Self) -> Self {
        let a = &self.data;
        let b = &rhs.data;
        Self::from_fn(|row, col| {
            a[3 * row] * b[3 * col]
                + a[3 * row + 1] * b[3 * col + 1]
                + a[3 * row + 2] * b[3 * col + 2]
        })
    }

    /// Elementwise difference `self - rhs`.
    pub fn subtract(&self, rhs: &Self) -> Self {
        self.zip_map(rhs, |a, b| a - b)
    }

    /// Multiply every component by `factor`.
    pub fn scale(&self, factor: S) -> Self {
        Self {
            data: self.data.map(|v| v * factor),
        }
    }

    /// Frobenius norm, the square root of the sum of squared components.
    pub fn norm(&self) -> S {
        self.data
            .iter()
            .fold(S::zero(), |acc, &v| acc + v * v)
            .sqrt()
    }

    /// Largest absolute component.
    pub fn max_abs(&self) -> S {
        self.data
            .iter()
            .fold(S::zero(), |acc, &v| acc.max(v.abs()))
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// The symmetric part `(self + self^T) / 2`.
    ///
    /// The result is exactly symmetric: components `(i, j)` and `(j, i)` are
    /// computed from the same operands.
    pub fn symmetric_part(&self) -> Self {
        let half = S::half();
        Self::from_fn(|row, col| (self[(row, col)] + self[(col, row)]) * half)
    }

    /// Matrix of cofactors, `C(i, j) = (-1)^(i + j) * minor(i, j)`.
    pub fn cofactor(&self) -> Self {
        let m = |row: usize, col: usize| self[(row, col)];
        Self::from_rows([
            [
                m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1),
                m(1, 2) * m(2, 0) - m(1, 0) * m(2, 2),
                m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0),
            ],
            [
                m(0, 2) * m(2, 1) - m(0, 1) * m(2, 2),
                m(0, 0) * m(2, 2) - m(0, 2) * m(2, 0),
                m(0, 1) * m(2, 0) - m(0, 0) * m(2, 1),
            ],
            [
                m(0, 1) * m(1, 2) - m(0, 2) * m(1, 1),
                m(0, 2) * m(1, 0) - m(0, 0) * m(1, 2),
                m(0, 0) * m(1, 1) - m(0, 1) * m(1, 0),
            ],
        ])
    }

    /// Determinant via Gaussian elimination with partial pivoting.
    ///
    /// The sign stays reliable for nearly rank-deficient matrices, where a
    /// cofactor expansion loses it to cancellation.
    pub fn determinant(&self) -> S {
        let mut a = *self;
        let mut sign = S::one();

        for col in 0..3 {
            // partial pivoting: row with the largest modulus in this column
            let mut pivot_row = col;
            let mut pivot_abs = a[(col, col)].abs();
            for row in (col + 1)..3 {
                let value = a[(row, col)].abs();
                if value > pivot_abs {
                    pivot_abs = value;
                    pivot_row = row;
                }
            }

            if pivot_abs == S::zero() {
                return S::zero();
            }

            if pivot_row != col {
                for j in col..3 {
                    let tmp = a[(col, j)];
                    a[(col, j)] = a[(pivot_row, j)];
                    a[(pivot_row, j)] = tmp;
                }
                sign = -sign;
            }

            let pivot = a[(col, col)];
            for row in (col + 1)..3 {
                let factor = a[(row, col)] / pivot;
                for j in (col + 1)..3 {
                    let value = a[(col, j)];
                    a[(row, j)] = a[(row, j)] - factor * value;
                }
                a[(row, col)] = S::zero();
            }
        }

        sign * a[(0, 0)] * a[(1, 1)] * a[(2, 2)]
    }

    /// Inverse as the adjugate divided by the determinant.
    ///
    /// # Errors
    ///
    /// Returns [`LinalgError::SingularMatrix`] when the absolute determinant is
    /// at or below [`Real::tolerance`], or is not a number.
    pub fn inverse(&self) -> Result<Self, LinalgError> {
        let cofactor = self.cofactor();
        let det = self.determinant();

        if !(det.abs() > S::tolerance()) {
            return Err(LinalgError::SingularMatrix {
                determinant: det.to_f64().unwrap_or(f64::NAN),
            });
        }

        // adjugate = cofactor^T
        let inv_det = det.recip();
        Ok(Self::from_fn(|row, col| cofactor[(col, row)] * inv_det))
    }

    fn zip_map(&self, rhs: &Self, f: impl Fn(S, S) -> S) -> Self {
        let mut data = self.data;
        for (lhs, &r) in data.iter_mut().zip(rhs.data.iter()) {
            *lhs = f(*lhs, r);
        }
        Self { data }
    }
}

impl<S: Real> Default for Matrix3<S> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<S> Index<usize> for Matrix3<S> {
    type Output = S;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<S> IndexMut<usize> for Matrix3<S> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<S> Index<(usize, usize)> for Matrix3<S> {
    type Output = S;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(row < 3 && col < 3, "Index ({row}, {col}) out of bounds for 3x3 matrix");
        &self.data[row + 3 * col]
    }
}

impl<S> IndexMut<(usize, usize)> for Matrix3<S> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(row < 3 && col < 3, "Index ({row}, {col}) out of bounds for 3x3 matrix");
        &mut self.data[row + 3 * col]
    }
}

// Conversions to and from column-major arrays.
impl<S: Real> From<[S; 9]> for Matrix3<S> {
    #[inline]
    fn from(arr: [S; 9]) -> Self {
        Self::from_cols_array(&arr)
    }
}

impl<S: Real> From<Matrix3<S>> for [S; 9] {
    #[inline]
    fn from(m: Matrix3<S>) -> Self {
        m.to_cols_array()
    }
}

// Matrix-matrix multiplication
impl<S: Real> Mul<Matrix3<S>> for Matrix3<S> {
    type Output = Matrix3<S>;

    #[inline]
    fn mul(self, rhs: Matrix3<S>) -> Self::Output {
        self.multiply(&rhs)
    }
}

// Matrix-scalar multiplication
impl<S: Real> Mul<S> for Matrix3<S> {
    type Output = Matrix3<S>;

    #[inline]
    fn mul(self, rhs: S) -> Self::Output {
        self.scale(rhs)
    }
}

impl<S: Real> Add<Matrix3<S>> for Matrix3<S> {
    type Output = Matrix3<S>;

    #[inline]
    fn add(self, rhs: Matrix3<S>) -> Self::Output {
        self.zip_map(&rhs, |a, b| a + b)
    }
}

impl<S: Real> Sub<Matrix3<S>> for Matrix3<S> {
    type Output = Matrix3<S>;

    #[inline]
    fn sub(self, rhs: Matrix3<S>) -> Self::Output {
        self.subtract(&rhs)
    }
}

#[cfg(feature = "approx")]
impl<S> approx::AbsDiffEq for Matrix3<S>
where
    S: Real + approx::AbsDiffEq<Epsilon = S>,
{
    type Epsilon = S;

    #[inline]
    fn default_epsilon() -> Self::Epsilon {
        S::default_epsilon()
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

#[cfg(feature = "approx")]
impl<S> approx::RelativeEq for Matrix3<S>
where
    S: Real + approx::RelativeEq<Epsilon = S>,
{
    #[inline]
    fn default_max_relative() -> Self::Epsilon {
        S::default_max_relative()
    }

    #[inline]
    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
