use std::fmt::Display;

use argh::FromArgs;

use polar_decomp::metrics::{orthogonality_error, relative_residual, scaled_orthogonal_error};
use polar_decomp::reference::{
    near_singular_condition, near_singular_matrix, to_matrix, HIGHAM_EXAMPLE, NEAR_SINGULAR_Q,
    NEAR_SINGULAR_PARAMETERS,
};
use polar_decomp::{polar_decomposition, Matrix3, PolarDecomposition, Real};

/// Floating point precisions the checks can run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Single,
    Double,
    Both,
}

#[derive(FromArgs, Debug)]
/// Check the polar decomposition against matrices with known factors.
struct Args {
    /// floating point precision to run: f32, f64 or both
    #[argh(
        option,
        short = 'p',
        default = "Precision::Both",
        from_str_fn(to_precision)
    )]
    precision: Precision,
}

fn to_precision(value: &str) -> Result<Precision, String> {
    match value {
        "f32" => Ok(Precision::Single),
        "f64" => Ok(Precision::Double),
        "both" => Ok(Precision::Both),
        _ => Err(format!(
            "Unsupported precision '{value}', expected f32, f64 or both"
        )),
    }
}

fn check<S: Real + Display>(a: &Matrix3<S>) -> PolarDecomposition<S> {
    let polar = polar_decomposition(a);
    println!(
        "Relative residual = {}, orthogonality = {}",
        relative_residual(a, &polar.q, &polar.h),
        orthogonality_error(&polar.q)
    );
    log::debug!(
        "{} iterations, converged = {}",
        polar.num_iterations,
        polar.converged
    );
    polar
}

fn run<S: Real + Display>(name: &str) {
    println!("Running tests in {name} precision");

    println!("Higham's example:");
    check(&to_matrix::<S>(&HIGHAM_EXAMPLE));

    let expected = to_matrix::<S>(&NEAR_SINGULAR_Q);
    for y in NEAR_SINGULAR_PARAMETERS {
        println!("Near-singular matrix with y = {y:e}:");
        let polar = check(&to_matrix::<S>(&near_singular_matrix(y)));

        let condition = near_singular_condition(y);
        println!(
            "Condition number of U = {condition}, scaled relative error in Q = {}",
            scaled_orthogonal_error(&polar.q, &expected, S::from_f64(condition))
        );
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    match args.precision {
        Precision::Single => run::<f32>("single"),
        Precision::Double => run::<f64>("double"),
        Precision::Both => {
            run::<f32>("single");
            run::<f64>("double");
        }
    }

    Ok(())
}
