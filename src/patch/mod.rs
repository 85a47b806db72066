//! Persistence of fitted parameters into a synthesizer patch document.
//!
//! The patch is a pre-existing JSON document with a `pattrstorage.slots`
//! tree; fitted values are merged into one numbered slot's `data` object
//! under compound per-partial keys (`partial[<i>]::A`, 1-based `i`). Every
//! scalar is wrapped in a one-element array, matching the synth's storage
//! format.

use crate::error::{EnvfitError, Result};
use crate::types::ParamVector;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;

/// Fitted parameters for one patch slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotParams {
    /// Shared envelope duration written to every partial.
    pub duration: f64,
    /// Oscillator frequencies, one per oscillator partial.
    pub osc_freqs: Vec<f64>,
    /// Static gains for the oscillator bank, aligned with `osc_freqs`.
    pub osc_bank_gains: Vec<f64>,
    /// Static gains for the noise bank.
    pub noise_bank_gains: Vec<f64>,
    /// Fitted (rate-up, rate-down) pairs per oscillator partial.
    pub osc_curve_params: Vec<ParamVector>,
    /// Fitted (rate-up, rate-down) pairs per noise partial.
    pub noise_curve_params: Vec<ParamVector>,
}

impl SlotParams {
    /// Slot carrying a single fitted partial. With a frequency the fit goes
    /// to the oscillator bank; without one it goes to the noise bank.
    pub fn single_partial(
        curve: ParamVector,
        osc_freq: Option<f64>,
        gain: f64,
        duration: f64,
    ) -> Result<Self> {
        let slot = match osc_freq {
            Some(freq) => Self {
                duration,
                osc_freqs: vec![freq],
                osc_bank_gains: vec![gain],
                noise_bank_gains: Vec::new(),
                osc_curve_params: vec![curve],
                noise_curve_params: Vec::new(),
            },
            None => Self {
                duration,
                osc_freqs: Vec::new(),
                osc_bank_gains: Vec::new(),
                noise_bank_gains: vec![gain],
                osc_curve_params: Vec::new(),
                noise_curve_params: vec![curve],
            },
        };
        slot.validate()?;
        Ok(slot)
    }

    fn validate(&self) -> Result<()> {
        if self.osc_curve_params.len() != self.osc_freqs.len()
            || self.osc_bank_gains.len() != self.osc_freqs.len()
        {
            return Err(EnvfitError::PatchFormat(format!(
                "oscillator banks disagree: {} freqs, {} gains, {} curve fits",
                self.osc_freqs.len(),
                self.osc_bank_gains.len(),
                self.osc_curve_params.len()
            )));
        }
        if self.noise_curve_params.len() != self.noise_bank_gains.len() {
            return Err(EnvfitError::PatchFormat(format!(
                "noise banks disagree: {} gains, {} curve fits",
                self.noise_bank_gains.len(),
                self.noise_curve_params.len()
            )));
        }
        for params in self.osc_curve_params.iter().chain(&self.noise_curve_params) {
            if params.len() < 2 {
                return Err(EnvfitError::PatchFormat(
                    "curve fit must carry at least (A, B)".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Merge `params` into slot `slot_id` of `doc`, leaving the rest of the
/// document untouched. Noise partials share the oscillator partials' key
/// space and are written second, without an `osc_freq` field.
pub fn merge_into_patch(doc: &mut Value, slot_id: u32, params: &SlotParams) -> Result<()> {
    params.validate()?;
    let data = slot_data_mut(doc, slot_id)?;

    data.insert(
        "osc_bank_gains".to_string(),
        json!(params.osc_bank_gains),
    );
    data.insert(
        "noise_bank_gains".to_string(),
        json!(params.noise_bank_gains),
    );

    for (i, curve) in params.osc_curve_params.iter().enumerate() {
        write_partial(data, i + 1, curve, params.duration, params.osc_bank_gains[i]);
        data.insert(
            format!("partial[{}]::osc_freq", i + 1),
            json!([params.osc_freqs[i]]),
        );
    }
    for (i, curve) in params.noise_curve_params.iter().enumerate() {
        write_partial(
            data,
            i + 1,
            curve,
            params.duration,
            params.noise_bank_gains[i],
        );
    }
    Ok(())
}

/// Read a patch document from `input`, merge `params` into `slot_id`, and
/// write the result to `output`.
pub fn update_patch_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    slot_id: u32,
    params: &SlotParams,
) -> Result<()> {
    let contents = std::fs::read_to_string(input)?;
    let mut doc: Value = serde_json::from_str(&contents)?;
    merge_into_patch(&mut doc, slot_id, params)?;
    std::fs::write(output, serde_json::to_string_pretty(&doc)?)?;
    log::info!("patch slot {slot_id} updated");
    Ok(())
}

/// Dump a single fitted parameter vector as a JSON array.
pub fn write_params<P: AsRef<Path>>(path: P, params: &[f64]) -> Result<()> {
    std::fs::write(path, serde_json::to_string(params)?)?;
    Ok(())
}

fn write_partial(
    data: &mut Map<String, Value>,
    index: usize,
    curve: &[f64],
    duration: f64,
    gain: f64,
) {
    data.insert(format!("partial[{index}]::A"), json!([curve[0]]));
    data.insert(format!("partial[{index}]::B"), json!([curve[1]]));
    data.insert(format!("partial[{index}]::duration"), json!([duration]));
    data.insert(format!("partial[{index}]::static_gain"), json!([gain]));
}

fn slot_data_mut(doc: &mut Value, slot_id: u32) -> Result<&mut Map<String, Value>> {
    doc.pointer_mut(&format!("/pattrstorage/slots/{slot_id}/data"))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| {
            EnvfitError::PatchFormat(format!(
                "no data object at pattrstorage.slots.{slot_id}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch_doc() -> Value {
        json!({
            "pattrstorage": {
                "name": "DNA_Synth",
                "slots": {
                    "1": { "data": { "master_gain": [0.8] } },
                    "2": { "data": {} }
                }
            }
        })
    }

    fn slot_params() -> SlotParams {
        SlotParams {
            duration: 1.5,
            osc_freqs: vec![220.0, 440.0],
            osc_bank_gains: vec![0.9, 0.4],
            noise_bank_gains: vec![0.2],
            osc_curve_params: vec![vec![2.0, 5.0], vec![1.5, 3.0]],
            noise_curve_params: vec![vec![0.7, 0.9]],
        }
    }

    #[test]
    fn merges_compound_keys_into_slot() {
        let mut doc = patch_doc();
        merge_into_patch(&mut doc, 1, &slot_params()).unwrap();

        let data = &doc["pattrstorage"]["slots"]["1"]["data"];
        assert_eq!(data["partial[2]::A"], json!([1.5]));
        assert_eq!(data["partial[2]::B"], json!([3.0]));
        assert_eq!(data["partial[2]::duration"], json!([1.5]));
        assert_eq!(data["partial[2]::osc_freq"], json!([440.0]));
        assert_eq!(data["osc_bank_gains"], json!([0.9, 0.4]));
        assert_eq!(data["noise_bank_gains"], json!([0.2]));
        // Noise partial 1 overwrites oscillator partial 1's envelope.
        assert_eq!(data["partial[1]::A"], json!([0.7]));
        assert_eq!(data["partial[1]::static_gain"], json!([0.2]));
        // Its osc_freq survives from the oscillator pass.
        assert_eq!(data["partial[1]::osc_freq"], json!([220.0]));
    }

    #[test]
    fn preserves_unrelated_document_content() {
        let mut doc = patch_doc();
        merge_into_patch(&mut doc, 1, &slot_params()).unwrap();
        assert_eq!(doc["pattrstorage"]["name"], json!("DNA_Synth"));
        assert_eq!(
            doc["pattrstorage"]["slots"]["1"]["data"]["master_gain"],
            json!([0.8])
        );
        assert_eq!(doc["pattrstorage"]["slots"]["2"], json!({ "data": {} }));
    }

    #[test]
    fn missing_slot_is_a_format_error() {
        let mut doc = patch_doc();
        assert!(matches!(
            merge_into_patch(&mut doc, 9, &slot_params()),
            Err(EnvfitError::PatchFormat(_))
        ));
    }

    #[test]
    fn mismatched_banks_are_rejected() {
        let mut doc = patch_doc();
        let mut params = slot_params();
        params.osc_freqs.pop();
        assert!(matches!(
            merge_into_patch(&mut doc, 1, &params),
            Err(EnvfitError::PatchFormat(_))
        ));
    }

    #[test]
    fn single_partial_slot_targets_oscillator_bank() {
        let slot = SlotParams::single_partial(vec![2.0, 5.0], Some(220.0), 0.8, 1.0).unwrap();
        let mut doc = patch_doc();
        merge_into_patch(&mut doc, 1, &slot).unwrap();

        let data = &doc["pattrstorage"]["slots"]["1"]["data"];
        assert_eq!(data["partial[1]::A"], json!([2.0]));
        assert_eq!(data["partial[1]::osc_freq"], json!([220.0]));
        assert_eq!(data["osc_bank_gains"], json!([0.8]));
        assert_eq!(data["noise_bank_gains"], json!([]));
    }

    #[test]
    fn single_partial_slot_without_freq_targets_noise_bank() {
        let slot = SlotParams::single_partial(vec![2.0, 5.0], None, 0.3, 1.0).unwrap();
        let mut doc = patch_doc();
        merge_into_patch(&mut doc, 1, &slot).unwrap();

        let data = &doc["pattrstorage"]["slots"]["1"]["data"];
        assert_eq!(data["partial[1]::A"], json!([2.0]));
        assert_eq!(data["partial[1]::static_gain"], json!([0.3]));
        assert_eq!(data["noise_bank_gains"], json!([0.3]));
        assert!(data.get("partial[1]::osc_freq").is_none());
    }

    #[test]
    fn single_partial_slot_needs_rate_pair() {
        assert!(matches!(
            SlotParams::single_partial(vec![2.0], None, 0.3, 1.0),
            Err(EnvfitError::PatchFormat(_))
        ));
    }

    #[test]
    fn update_patch_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("patch.json");
        let output = dir.path().join("patch_out.json");
        std::fs::write(&input, serde_json::to_string(&patch_doc()).unwrap()).unwrap();

        update_patch_file(&input, &output, 1, &slot_params()).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written["pattrstorage"]["slots"]["1"]["data"]["partial[1]::B"],
            json!([0.9])
        );
    }

    #[test]
    fn write_params_dumps_plain_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve_param.json");
        write_params(&path, &[0.25, 0.5]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[0.25,0.5]");
    }
}
