//! Genetic operators over parameter vectors. All randomness comes from the
//! caller-supplied generator, so seeded runs replay exactly.

use crate::error::{EnvfitError, Result};
use crate::types::{CurveFamily, ParamVector};
use rand::Rng;

/// Keeps the worst individual's selection weight above zero after shifting.
const WEIGHT_EPSILON: f64 = 1e-9;

/// Draw a random parameter vector for `family`, each component uniform in
/// [0, 1].
pub fn random_params<R: Rng>(family: CurveFamily, rng: &mut R) -> ParamVector {
    (0..family.arity()).map(|_| rng.gen::<f64>()).collect()
}

/// Fitness-proportional sampling of `count` parents with replacement.
///
/// Fitness scores are non-positive (negative MSE), which raw roulette
/// sampling cannot use, so each call shifts the scores by the population
/// minimum plus a small epsilon. Ordering is preserved, the worst individual
/// keeps a vanishing chance, and an all-tied population degenerates to
/// uniform sampling. Non-finite scores abort the run.
pub fn weighted_selection<R: Rng>(
    population: &[ParamVector],
    scores: &[f64],
    count: usize,
    rng: &mut R,
) -> Result<Vec<ParamVector>> {
    if population.is_empty() {
        return Err(EnvfitError::EmptyPopulation);
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(EnvfitError::InvalidSelectionWeights(
            "non-finite fitness score in population".to_string(),
        ));
    }

    let min_score = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = scores
        .iter()
        .map(|s| s - min_score + WEIGHT_EPSILON)
        .collect();
    let total: f64 = weights.iter().sum();

    let mut parents = Vec::with_capacity(count);
    for _ in 0..count {
        let mut spin = rng.gen::<f64>() * total;
        let mut chosen = population.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            spin -= w;
            if spin <= 0.0 {
                chosen = i;
                break;
            }
        }
        parents.push(population[chosen].clone());
    }
    Ok(parents)
}

/// Single-point crossover. Both children come from the same cut index,
/// crossed in both directions. Children have the shorter parent's length;
/// vectors shorter than 2 components are returned as clones.
pub fn crossover<R: Rng>(
    parent1: &[f64],
    parent2: &[f64],
    rng: &mut R,
) -> (ParamVector, ParamVector) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let cut = rng.gen_range(1..len);

    let mut child1 = parent1[..len].to_vec();
    let mut child2 = parent2[..len].to_vec();
    child1[cut..].copy_from_slice(&parent2[cut..len]);
    child2[cut..].copy_from_slice(&parent1[cut..len]);

    (child1, child2)
}

/// With probability `mutation_rate`, replace one uniformly chosen component
/// with a fresh uniform [0, 1] draw. Consumes and returns the vector rather
/// than mutating a shared one.
pub fn mutate<R: Rng>(mut params: ParamVector, mutation_rate: f64, rng: &mut R) -> ParamVector {
    if !params.is_empty() && rng.gen::<f64>() < mutation_rate {
        let index = rng.gen_range(0..params.len());
        params[index] = rng.gen::<f64>();
    }
    params
}
