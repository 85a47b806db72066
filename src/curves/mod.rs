//! Pure, stateless curve generators. A generator maps a parameter vector and
//! a sample count to a [`Curve`]; nothing here holds state or draws
//! randomness.

mod adsr;
mod exponential;

pub use adsr::adsr;
pub use exponential::{exp_relaxation, exponential};

use crate::error::{EnvfitError, Result};
use crate::types::{Curve, CurveFamily};

/// Generate a curve of `len` samples for `family` from `params`, checking the
/// parameter arity first.
pub fn generate(family: CurveFamily, params: &[f64], len: usize) -> Result<Curve> {
    if params.len() != family.arity() {
        return Err(EnvfitError::ArityMismatch {
            family: family.name(),
            expected: family.arity(),
            actual: params.len(),
        });
    }
    match family {
        CurveFamily::Adsr => adsr(params[0], params[1], params[2], params[3], len),
        CurveFamily::Exponential => Ok(exponential(params[0], params[1], len)),
        CurveFamily::ExpRelaxation { variant } => {
            exp_relaxation(params[0], params[1], params[2], variant, len)
        }
    }
}

/// `n` evenly spaced values from `start` to `stop`, endpoints included.
/// `n == 1` yields `[start]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
