use super::traits::ConfigSection;
use crate::error::EnvfitError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Number of individuals per generation. Must be even: offspring are
    /// bred from consecutive parent pairs.
    pub population_size: usize,
    /// Probability that a child has one component replaced by a fresh
    /// uniform [0, 1] draw.
    pub mutation_rate: f64,
    /// Number of selection/crossover/mutation cycles. The sole termination
    /// condition; 0 returns the best of the initial random population.
    pub generations: usize,
    /// Fixed RNG seed for reproducible runs; `None` seeds from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_rate: 0.1,
            generations: 1000,
            seed: None,
        }
    }
}

impl ConfigSection for EstimatorConfig {
    fn section_name() -> &'static str {
        "estimator"
    }

    fn validate(&self) -> Result<(), EnvfitError> {
        if self.population_size < 2 {
            return Err(EnvfitError::InvalidPopulationSize(format!(
                "{} is below the minimum of 2",
                self.population_size
            )));
        }
        if self.population_size % 2 != 0 {
            return Err(EnvfitError::InvalidPopulationSize(format!(
                "{} is odd; pairwise crossover needs an even population",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EnvfitError::Configuration(format!(
                "mutation rate {} must lie in [0, 1]",
                self.mutation_rate
            )));
        }
        Ok(())
    }
}
