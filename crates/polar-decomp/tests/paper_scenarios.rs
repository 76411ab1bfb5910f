use polar_decomp::metrics::{
    orthogonality_error, relative_residual, scaled_orthogonal_error, symmetry_error,
};
use polar_decomp::polar_decomposition;
use polar_decomp::reference::{
    near_singular_condition, near_singular_matrix, to_matrix, HIGHAM_EXAMPLE, NEAR_SINGULAR_Q,
    NEAR_SINGULAR_PARAMETERS,
};

/// Residual a backward-stable method reaches for a factor with condition
/// number `condition`, capped where the bound stops saying anything.
fn residual_bound(epsilon: f64, condition: f64) -> f64 {
    (epsilon * (16.0 + condition)).min(1e-4)
}

#[test]
fn test_higham_example_f64() {
    let a = to_matrix::<f64>(&HIGHAM_EXAMPLE);
    let polar = polar_decomposition(&a);

    assert!(polar.converged);
    assert!(polar.num_iterations <= 10);
    assert!(relative_residual(&a, &polar.q, &polar.h) < 1e-12);
    assert!(orthogonality_error(&polar.q) < 1e-12);
    assert_eq!(symmetry_error(&polar.h), 0.0);
    // det(A) < 0, so the closest orthogonal matrix is a reflection
    assert!((polar.q.determinant() + 1.0).abs() < 1e-12);
}

#[test]
fn test_higham_example_f32() {
    let a = to_matrix::<f32>(&HIGHAM_EXAMPLE);
    let polar = polar_decomposition(&a);

    assert!(polar.converged);
    assert!(relative_residual(&a, &polar.q, &polar.h) < 1e-5);
    assert!(orthogonality_error(&polar.q) < 1e-5);
    assert_eq!(symmetry_error(&polar.h), 0.0);
}

#[test]
fn test_near_singular_family_f64() {
    let expected = to_matrix::<f64>(&NEAR_SINGULAR_Q);
    for y in NEAR_SINGULAR_PARAMETERS {
        let a = to_matrix::<f64>(&near_singular_matrix(y));
        let condition = near_singular_condition(y);
        let polar = polar_decomposition(&a);

        assert!(polar.converged, "y = {y:e}");
        assert!(polar.q.is_finite() && polar.h.is_finite(), "y = {y:e}");

        let orthogonality = orthogonality_error(&polar.q);
        assert!(orthogonality < 1e-14, "y = {y:e}: orthogonality {orthogonality:e}");

        let residual = relative_residual(&a, &polar.q, &polar.h);
        let bound = residual_bound(f64::EPSILON, condition);
        assert!(residual < bound, "y = {y:e}: residual {residual:e} >= {bound:e}");

        // Q * diag(1, -1, -1) scores about 3e-14 at y = 1e-14
        let scaled = scaled_orthogonal_error(&polar.q, &expected, condition);
        assert!(scaled < 16.0 * f64::EPSILON, "y = {y:e}: scaled error {scaled:e}");

        assert_eq!(symmetry_error(&polar.h), 0.0, "y = {y:e}");
    }
}

#[test]
fn test_near_singular_family_keeps_rotation_f64() {
    // until the family is numerically rank one the factor is recoverable
    let expected = to_matrix::<f64>(&NEAR_SINGULAR_Q);
    for y in [1e-10, 1e-12, 1e-14] {
        let a = to_matrix::<f64>(&near_singular_matrix(y));
        let polar = polar_decomposition(&a);

        assert!(polar.q.determinant() > 0.0, "y = {y:e}");
        let error = polar.q.subtract(&expected).norm();
        let bound = 16.0 * f64::EPSILON * near_singular_condition(y);
        assert!(error < bound, "y = {y:e}: |Q - Q_exp| {error:e}");
    }
}

#[test]
fn test_near_singular_family_f32() {
    let expected = to_matrix::<f32>(&NEAR_SINGULAR_Q);
    for y in NEAR_SINGULAR_PARAMETERS {
        let a = to_matrix::<f32>(&near_singular_matrix(y));
        let condition = near_singular_condition(y);
        let polar = polar_decomposition(&a);

        assert!(polar.q.is_finite() && polar.h.is_finite(), "y = {y:e}");

        let orthogonality = orthogonality_error(&polar.q);
        assert!(orthogonality < 1e-5, "y = {y:e}: orthogonality {orthogonality:e}");

        let residual = relative_residual(&a, &polar.q, &polar.h) as f64;
        let bound = residual_bound(f32::EPSILON as f64, condition);
        assert!(residual < bound, "y = {y:e}: residual {residual:e} >= {bound:e}");

        let scaled = scaled_orthogonal_error(&polar.q, &expected, condition as f32);
        assert!(scaled < 16.0 * f32::EPSILON, "y = {y:e}: scaled error {scaled:e}");
    }
}

#[test]
fn test_well_conditioned_member_recovers_factor() {
    let a = to_matrix::<f64>(&near_singular_matrix(1.0));
    let expected = to_matrix::<f64>(&NEAR_SINGULAR_Q);
    let polar = polar_decomposition(&a);
    assert!(polar.q.subtract(&expected).norm() < 1e-12);
}
