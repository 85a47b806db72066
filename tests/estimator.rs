use envfit::config::{EstimatorConfig, FitConfig};
use envfit::estimator::{GeneticEstimator, NullProgress, ProgressCallback};
use envfit::fitness::{mean_squared_error, FitnessEvaluator};
use envfit::{curves, fit, CurveFamily, RelaxationVariant};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

const TRUE_ADSR: [f64; 4] = [0.2, 0.3, 0.5, 0.5];

fn noisy_curve(clean: &[f64], sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).unwrap();
    clean.iter().map(|v| v + normal.sample(&mut rng)).collect()
}

/// Progress recorder used to check the generation count end to end.
struct Recorder {
    generations_seen: usize,
    last_best: f64,
}

impl ProgressCallback for Recorder {
    fn on_generation_complete(&mut self, _generation: usize, best_fitness: f64) {
        self.generations_seen += 1;
        self.last_best = best_fitness;
    }
}

#[test]
fn recovers_adsr_curve_from_noisy_target() {
    let clean = curves::generate(CurveFamily::Adsr, &TRUE_ADSR, 100).unwrap();
    let target = noisy_curve(&clean, 0.005, 99);

    let evaluator = FitnessEvaluator::new(target, CurveFamily::Adsr).unwrap();
    let config = EstimatorConfig {
        population_size: 100,
        mutation_rate: 0.1,
        generations: 500,
        seed: Some(1234),
    };
    let mut estimator = GeneticEstimator::new(config, &evaluator).unwrap();

    let mut recorder = Recorder {
        generations_seen: 0,
        last_best: f64::NEG_INFINITY,
    };
    let best = estimator.run(&mut recorder).unwrap();
    assert_eq!(recorder.generations_seen, 500);

    let fitted = curves::generate(CurveFamily::Adsr, &best, 100).unwrap();
    let mse = mean_squared_error(&fitted, &clean);
    assert!(mse < 0.01, "recovered curve MSE {mse} exceeds tolerance");
}

#[test]
fn zero_generations_reports_initial_population_best() {
    let clean = curves::generate(CurveFamily::Adsr, &TRUE_ADSR, 100).unwrap();
    let evaluator = FitnessEvaluator::new(clean, CurveFamily::Adsr).unwrap();

    let config = EstimatorConfig {
        population_size: 40,
        mutation_rate: 0.1,
        generations: 0,
        seed: Some(7),
    };
    let mut estimator = GeneticEstimator::new(config.clone(), &evaluator).unwrap();
    let best = estimator.run(&mut NullProgress).unwrap();

    // Reconstruct the seeded initial population by hand and compare.
    let mut rng = StdRng::seed_from_u64(7);
    let population: Vec<Vec<f64>> = (0..config.population_size)
        .map(|_| envfit::estimator::operators::random_params(CurveFamily::Adsr, &mut rng))
        .collect();
    let expected = evaluator.best_of(&population).unwrap();
    assert_eq!(&best, expected);
}

#[test]
fn genetic_search_also_fits_exponential_targets() {
    let family = CurveFamily::Exponential;
    let clean = curves::generate(family, &[0.8, 0.9], 100).unwrap();
    let evaluator = FitnessEvaluator::new(clean.clone(), family).unwrap();

    let config = EstimatorConfig {
        population_size: 60,
        mutation_rate: 0.1,
        generations: 150,
        seed: Some(21),
    };
    let mut estimator = GeneticEstimator::new(config, &evaluator).unwrap();
    let best = estimator.run(&mut NullProgress).unwrap();

    let fitted = curves::generate(family, &best, 100).unwrap();
    assert!(mean_squared_error(&fitted, &clean) < 0.01);
}

#[test]
fn lm_beats_genetic_tolerance_on_clean_exponential() {
    let family = CurveFamily::Exponential;
    let clean = curves::generate(family, &[2.0, 5.0], 100).unwrap();
    let evaluator = FitnessEvaluator::new(clean.clone(), family).unwrap();

    let fitted = fit::curve_fit(&evaluator, &[1.0, 1.0], &FitConfig::default()).unwrap();
    let fitted_curve = curves::generate(family, &fitted, 100).unwrap();
    assert!(mean_squared_error(&fitted_curve, &clean) < 1e-8);
}

#[test]
fn relaxation_variants_yield_distinct_fits() {
    let time_family = CurveFamily::ExpRelaxation {
        variant: RelaxationVariant::TimeValue,
    };
    let index_family = CurveFamily::ExpRelaxation {
        variant: RelaxationVariant::SampleIndex,
    };
    let params = [1.5, 4.0, 0.6];
    let time_curve = curves::generate(time_family, &params, 80).unwrap();
    let index_curve = curves::generate(index_family, &params, 80).unwrap();
    assert!(mean_squared_error(&time_curve, &index_curve) > 1e-6);
}
