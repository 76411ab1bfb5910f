use num_traits::Float;
use std::fmt::Debug;

/// Multiple of machine epsilon used as the comparison tolerance.
const TOLERANCE_EPSILONS: f64 = 16.0;

/// Floating-point scalar the matrix and decomposition code is generic over.
///
/// Implemented for `f32` and `f64`. Square root and absolute value come from
/// [`Float`] (`x.sqrt()`, `x.abs()`), so the same algorithm body is
/// monomorphized for both widths without going through `f64`.
pub trait Real: Float + Debug + Default + Send + Sync + 'static {
    /// Tolerance for comparisons against zero, proportional to machine epsilon.
    ///
    /// Used by the singularity check of [`Matrix3::inverse`](crate::Matrix3::inverse).
    fn tolerance() -> Self;

    /// Converts an `f64` constant into `Self`, rounding to nearest for `f32`.
    fn from_f64(value: f64) -> Self;

    /// One half, used by averaging steps.
    #[inline]
    fn half() -> Self {
        Self::from_f64(0.5)
    }
}

macro_rules! impl_real {
    ($($t:ty),*) => {
        $(
            impl Real for $t {
                #[inline]
                fn tolerance() -> $t {
                    <$t>::EPSILON * (TOLERANCE_EPSILONS as $t)
                }

                #[inline]
                fn from_f64(value: f64) -> $t {
                    value as $t
                }
            }
        )*
    };
}

impl_real!(f32, f64);
