use super::linspace;
use crate::error::{EnvfitError, Result};
use crate::types::Curve;

/// Generate an ADSR envelope of `len` samples.
///
/// The attack, decay and release durations partition the sample axis
/// proportionally; each segment length is floored, so a short tail of
/// samples can remain at 0.0 past the release segment. That truncation tail
/// is part of the shape contract, not an accident.
///
/// Segment ramps are linear: 0 -> 1 over the attack, 1 -> `s` over the
/// decay, `s` -> 0 over the release.
pub fn adsr(a: f64, d: f64, s: f64, r: f64, len: usize) -> Result<Curve> {
    if a < 0.0 || d < 0.0 || r < 0.0 {
        return Err(EnvfitError::DegenerateParams(format!(
            "negative duration in (A={a}, D={d}, R={r})"
        )));
    }
    let total = a + d + r;
    if !(total > 0.0) {
        return Err(EnvfitError::DegenerateParams(format!(
            "total duration A + D + R = {total} must be positive"
        )));
    }

    let attack_len = (a / total * len as f64) as usize;
    let decay_len = (d / total * len as f64) as usize;
    let release_len = (r / total * len as f64) as usize;

    let mut curve = vec![0.0; len];
    fill_ramp(&mut curve[..attack_len], 0.0, 1.0);
    fill_ramp(&mut curve[attack_len..attack_len + decay_len], 1.0, s);
    let sustain_end = attack_len + decay_len;
    fill_ramp(&mut curve[sustain_end..sustain_end + release_len], s, 0.0);
    Ok(curve)
}

fn fill_ramp(segment: &mut [f64], from: f64, to: f64) {
    segment.copy_from_slice(&linspace(from, to, segment.len()));
}
