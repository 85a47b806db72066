//! Fitness scoring for candidate parameter vectors.

use crate::curves;
use crate::error::{EnvfitError, Result};
use crate::types::{Curve, CurveFamily, ParamVector};

/// Mean squared error between two equal-length sample sequences.
pub fn mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    sum / a.len() as f64
}

/// Scores parameter vectors against a fixed target curve.
///
/// The target and the curve family are bound once at construction; every
/// candidate is rendered to a curve of the target's length and scored by
/// negative mean squared error, so scores are always <= 0 and a perfect
/// match scores exactly 0.
pub struct FitnessEvaluator {
    target: Curve,
    family: CurveFamily,
}

impl FitnessEvaluator {
    pub fn new(target: Curve, family: CurveFamily) -> Result<Self> {
        if target.is_empty() {
            return Err(EnvfitError::EmptyTarget);
        }
        Ok(Self { target, family })
    }

    pub fn family(&self) -> CurveFamily {
        self.family
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Render the candidate curve for `params` at the target's length.
    pub fn generate(&self, params: &[f64]) -> Result<Curve> {
        curves::generate(self.family, params, self.target.len())
    }

    /// Negative mean squared error of the candidate against the target.
    pub fn evaluate(&self, params: &[f64]) -> Result<f64> {
        let candidate = self.generate(params)?;
        Ok(-mean_squared_error(&candidate, &self.target))
    }

    /// The individual with the highest fitness. Ties break toward the
    /// earliest individual in iteration order.
    pub fn best_of<'a>(&self, population: &'a [ParamVector]) -> Result<&'a ParamVector> {
        let mut best: Option<(&ParamVector, f64)> = None;
        for individual in population {
            let score = self.evaluate(individual)?;
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((individual, score)),
            }
        }
        best.map(|(individual, _)| individual)
            .ok_or(EnvfitError::EmptyPopulation)
    }
}
