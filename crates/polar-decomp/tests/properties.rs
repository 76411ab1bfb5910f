use polar_decomp::metrics::{orthogonality_error, relative_residual};
use polar_decomp::{polar_decomposition, Matrix3, PolarDecomposition};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng) -> Matrix3<f64> {
    let values: [f64; 9] = std::array::from_fn(|_| rng.random_range(-1.0..1.0));
    Matrix3::from_cols_array(&values)
}

fn max_component_diff(a: &Matrix3<f64>, b: &Matrix3<f64>) -> f64 {
    (0..9).fold(0.0_f64, |acc, i| acc.max((a[i] - b[i]).abs()))
}

/// Sylvester's criterion relaxed to semi-definiteness: all principal minors
/// are non-negative up to `epsilon`.
fn is_positive_semidefinite(h: &Matrix3<f64>, epsilon: f64) -> bool {
    let diagonal = (0..3).all(|i| h[(i, i)] >= -epsilon);
    let pairs = [(0, 1), (0, 2), (1, 2)]
        .iter()
        .all(|&(i, j)| h[(i, i)] * h[(j, j)] - h[(i, j)] * h[(j, i)] >= -epsilon);
    diagonal && pairs && h.determinant() >= -epsilon
}

#[test]
fn test_random_matrices() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..500 {
        let a = random_matrix(&mut rng);
        let PolarDecomposition {
            q,
            h,
            num_iterations,
            converged,
        } = polar_decomposition(&a);

        assert!(converged);
        assert!(num_iterations <= 10, "{num_iterations} iterations for {a:?}");
        assert!(orthogonality_error(&q) < 1e-12);
        assert!(relative_residual(&a, &q, &h) < 1e-10);
        assert_eq!(h, h.transpose());
        assert!(is_positive_semidefinite(&h, 1e-10), "{h:?}");
        // det(Q) follows the sign of det(A)
        assert!(q.determinant() * a.determinant().signum() > 0.0);
    }
}

#[test]
fn test_decomposing_the_product_again() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..100 {
        let a = random_matrix(&mut rng);
        let first = polar_decomposition(&a);
        let second = polar_decomposition(&first.q.multiply(&first.h));

        assert!(max_component_diff(&first.q, &second.q) < 1e-10);
        assert!(max_component_diff(&first.h, &second.h) < 1e-10);
    }
}

#[test]
fn test_scale_invariance() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = random_matrix(&mut rng);
    let reference = polar_decomposition(&a);

    for scale in [1e-200, 1e-20, 1e20, 1e200] {
        let polar = polar_decomposition(&a.scale(scale));
        assert!(polar.q.is_finite() && polar.h.is_finite(), "scale {scale:e}");
        assert!(max_component_diff(&polar.q, &reference.q) < 1e-12, "scale {scale:e}");

        let h = polar.h.scale(scale.recip());
        assert!(max_component_diff(&h, &reference.h) < 1e-12, "scale {scale:e}");
    }
}

#[test]
fn test_entries_near_overflow() {
    let a = Matrix3::from_rows([[1e300, 2e300, 0.0], [0.0, 1e300, 0.0], [0.0, 0.0, 1e-300]]);
    let polar = polar_decomposition(&a);

    assert!(polar.converged);
    assert!(polar.q.is_finite() && polar.h.is_finite());
    assert!(orthogonality_error(&polar.q) < 1e-14);
    let residual = relative_residual(&a, &polar.q, &polar.h);
    assert!(residual < 1e-14, "residual {residual:e}");
}

#[test]
fn test_concurrent_calls() {
    let mut rng = StdRng::seed_from_u64(11);
    let inputs: Vec<Matrix3<f64>> = (0..64).map(|_| random_matrix(&mut rng)).collect();
    let expected: Vec<_> = inputs.iter().map(polar_decomposition).collect();

    let results: Vec<Vec<PolarDecomposition<f64>>> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .chunks(16)
            .map(|chunk| {
                s.spawn(move || chunk.iter().map(polar_decomposition).collect::<Vec<_>>())
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker thread panicked"))
            .collect()
    });

    let results: Vec<_> = results.into_iter().flatten().collect();
    assert_eq!(results, expected);
}
