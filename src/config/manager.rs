use super::{estimator::EstimatorConfig, fit::FitConfig, traits::ConfigSection};
use crate::error::EnvfitError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub fit: FitConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EnvfitError> {
        validate_section(&self.estimator)?;
        validate_section(&self.fit)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EnvfitError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EnvfitError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| EnvfitError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EnvfitError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| EnvfitError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EnvfitError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}

/// Prefix a section's validation failure with its name so file-level errors
/// say which table is at fault.
fn validate_section<C: ConfigSection>(section: &C) -> Result<(), EnvfitError> {
    section.validate().map_err(|e| {
        EnvfitError::Configuration(format!("[{}] {}", C::section_name(), e))
    })
}
