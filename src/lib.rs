//! Parameter estimation for parametric envelope curves.
//!
//! Given a target curve (amplitude samples over normalized time), `envfit`
//! searches for the parameter vector of a chosen curve family (ADSR,
//! exponential, exponential-with-relaxation) whose generated curve best
//! matches the target. Two search strategies are available: a genetic
//! estimator ([`estimator::GeneticEstimator`]) and a Levenberg-Marquardt
//! least-squares fit ([`fit::curve_fit`]) for the exponential families.

pub mod config;
pub mod curves;
pub mod error;
pub mod estimator;
pub mod fit;
pub mod fitness;
pub mod patch;
pub mod render;
pub mod types;

pub use error::{EnvfitError, Result};
pub use types::{Curve, CurveFamily, ParamVector, RelaxationVariant};
