use super::linspace;
use crate::error::{EnvfitError, Result};
use crate::types::{Curve, RelaxationVariant};

/// Generate `exp(-a t) * (1 - exp(-b t))` over `t` in [0, 1].
///
/// The first sample is always exactly 0 since `1 - exp(0) = 0`.
pub fn exponential(a: f64, b: f64, len: usize) -> Curve {
    linspace(0.0, 1.0, len)
        .into_iter()
        .map(|t| shape(a, b, t))
        .collect()
}

/// Exponential curve that freezes at a relaxation point and then decays.
///
/// `c` is the relaxation fraction in [0, 1]; the split happens at sample
/// index `floor(c * len)`. Before the split the curve is [`exponential`];
/// from the split on, a frozen value decays as `exp(-(t - t0))`. The frozen
/// value and the decay origin `t0` depend on `variant`: [`RelaxationVariant::TimeValue`]
/// uses the time value `c`, [`RelaxationVariant::SampleIndex`] uses the raw
/// sample index.
pub fn exp_relaxation(
    a: f64,
    b: f64,
    c: f64,
    variant: RelaxationVariant,
    len: usize,
) -> Result<Curve> {
    if !(0.0..=1.0).contains(&c) {
        return Err(EnvfitError::DegenerateParams(format!(
            "relaxation fraction C = {c} must lie in [0, 1]"
        )));
    }
    let rel_idx = ((c * len as f64) as usize).min(len);
    let t0 = match variant {
        RelaxationVariant::TimeValue => c,
        RelaxationVariant::SampleIndex => rel_idx as f64,
    };
    let frozen = shape(a, b, t0);

    Ok(linspace(0.0, 1.0, len)
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            if i < rel_idx {
                shape(a, b, t)
            } else {
                frozen * (-(t - t0)).exp()
            }
        })
        .collect())
}

#[inline]
fn shape(a: f64, b: f64, t: f64) -> f64 {
    (-a * t).exp() * (1.0 - (-b * t).exp())
}
