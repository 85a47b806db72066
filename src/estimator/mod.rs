//! Genetic search over parameter vectors.

mod engine;
pub mod operators;

pub use engine::{GeneticEstimator, NullProgress, ProgressCallback};
