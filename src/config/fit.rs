use super::traits::ConfigSection;
use crate::error::EnvfitError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Maximum Levenberg-Marquardt iterations before giving up.
    pub max_iterations: usize,
    /// Initial damping factor; grows on rejected steps, shrinks on accepted
    /// ones.
    pub initial_lambda: f64,
    /// Relative cost-improvement threshold that counts as convergence.
    pub tolerance: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            initial_lambda: 1e-3,
            tolerance: 1e-10,
        }
    }
}

impl ConfigSection for FitConfig {
    fn section_name() -> &'static str {
        "fit"
    }

    fn validate(&self) -> Result<(), EnvfitError> {
        if self.max_iterations == 0 {
            return Err(EnvfitError::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.initial_lambda > 0.0) {
            return Err(EnvfitError::Configuration(format!(
                "initial lambda {} must be positive",
                self.initial_lambda
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(EnvfitError::Configuration(format!(
                "tolerance {} must be positive",
                self.tolerance
            )));
        }
        Ok(())
    }
}
