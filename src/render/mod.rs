//! Read-only export of fitting results for external inspection.

use crate::error::{EnvfitError, Result};
use crate::types::{CurveFamily, ParamVector};
use std::fmt::Write as _;
use std::path::Path;

/// Write target and fitted curves side by side as CSV
/// (`index,target,fitted`) for external plotting.
pub fn write_comparison_csv<P: AsRef<Path>>(
    path: P,
    target: &[f64],
    fitted: &[f64],
) -> Result<()> {
    if target.len() != fitted.len() {
        return Err(EnvfitError::Configuration(format!(
            "curve lengths differ: target {}, fitted {}",
            target.len(),
            fitted.len()
        )));
    }

    let mut out = String::with_capacity(target.len() * 24);
    out.push_str("index,target,fitted\n");
    for (i, (t, f)) in target.iter().zip(fitted).enumerate() {
        let _ = writeln!(out, "{i},{t},{f}");
    }
    std::fs::write(&path, out)?;
    log::info!("wrote curve comparison to {}", path.as_ref().display());
    Ok(())
}

/// One-paragraph result summary for terminal output.
pub fn summary(family: CurveFamily, params: &ParamVector, mse: f64) -> String {
    let rendered: Vec<String> = params.iter().map(|p| format!("{p:.6}")).collect();
    format!(
        "{} fit: [{}] (MSE {:.3e})",
        family,
        rendered.join(", "),
        mse
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves.csv");
        write_comparison_csv(&path, &[0.0, 0.5, 1.0], &[0.1, 0.4, 0.9]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "index,target,fitted");
        assert_eq!(lines[2], "1,0.5,0.4");
    }

    #[test]
    fn csv_rejects_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves.csv");
        assert!(write_comparison_csv(&path, &[0.0, 1.0], &[0.5]).is_err());
    }

    #[test]
    fn summary_names_family_and_error() {
        let text = summary(CurveFamily::Exponential, &vec![2.0, 5.0], 1.25e-4);
        assert!(text.starts_with("exp fit:"));
        assert!(text.contains("2.000000"));
        assert!(text.contains("1.250e-4"));
    }
}
