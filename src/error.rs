use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvfitError {
    #[error("Unsupported curve family: {0}")]
    UnsupportedFamily(String),

    #[error("Parameter arity mismatch: {family} expects {expected} parameters, got {actual}")]
    ArityMismatch {
        family: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Degenerate parameter vector: {0}")]
    DegenerateParams(String),

    #[error("Invalid population size: {0}")]
    InvalidPopulationSize(String),

    #[error("Empty population")]
    EmptyPopulation,

    #[error("Empty target curve")]
    EmptyTarget,

    #[error("Invalid selection weights: {0}")]
    InvalidSelectionWeights(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Patch format error: {0}")]
    PatchFormat(String),

    #[error("Fit did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EnvfitError>;
