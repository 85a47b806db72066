use crate::config::{ConfigSection, EstimatorConfig};
use crate::error::Result;
use crate::estimator::operators;
use crate::fitness::FitnessEvaluator;
use crate::types::ParamVector;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Per-generation hook for long runs.
pub trait ProgressCallback {
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64);
}

/// Callback that ignores all progress events.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: f64) {}
}

/// Population-based stochastic search for a high-fitness parameter vector.
///
/// Each generation scores the whole population, draws parents by
/// fitness-weighted sampling with replacement, breeds consecutive pairs by
/// single-point crossover, mutates the children, and replaces the population
/// wholesale. There is no elitism and no early stopping: fitness can regress
/// between generations, and only the final generation's best individual is
/// reported.
pub struct GeneticEstimator<'a> {
    config: EstimatorConfig,
    evaluator: &'a FitnessEvaluator,
    rng: StdRng,
}

impl<'a> GeneticEstimator<'a> {
    pub fn new(config: EstimatorConfig, evaluator: &'a FitnessEvaluator) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            evaluator,
            rng,
        })
    }

    /// Run the configured number of generations and return the best
    /// individual of the final population.
    pub fn run<C: ProgressCallback>(&mut self, callback: &mut C) -> Result<ParamVector> {
        let family = self.evaluator.family();
        let mut population: Vec<ParamVector> = (0..self.config.population_size)
            .map(|_| operators::random_params(family, &mut self.rng))
            .collect();

        for generation in 0..self.config.generations {
            let scores = self.score_population(&population)?;

            let best = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            log::debug!(
                "generation {}/{}: best fitness {:.6}",
                generation + 1,
                self.config.generations,
                best
            );
            callback.on_generation_complete(generation, best);

            let parents = operators::weighted_selection(
                &population,
                &scores,
                self.config.population_size,
                &mut self.rng,
            )?;
            population = self.breed(&parents);
        }

        let best = self.evaluator.best_of(&population)?;
        Ok(best.clone())
    }

    fn score_population(&self, population: &[ParamVector]) -> Result<Vec<f64>> {
        population
            .iter()
            .map(|individual| self.evaluator.evaluate(individual))
            .collect()
    }

    /// Two children per consecutive parent pair; the pair count is
    /// population_size / 2, guaranteed whole by config validation.
    fn breed(&mut self, parents: &[ParamVector]) -> Vec<ParamVector> {
        let mut next_generation = Vec::with_capacity(parents.len());
        for pair in parents.chunks_exact(2) {
            let (child1, child2) = operators::crossover(&pair[0], &pair[1], &mut self.rng);
            next_generation.push(operators::mutate(
                child1,
                self.config.mutation_rate,
                &mut self.rng,
            ));
            next_generation.push(operators::mutate(
                child2,
                self.config.mutation_rate,
                &mut self.rng,
            ));
        }
        next_generation
    }
}
