use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use envfit::config::AppConfig;
use envfit::estimator::{GeneticEstimator, ProgressCallback};
use envfit::fitness::{mean_squared_error, FitnessEvaluator};
use envfit::{curves, fit, patch, render, CurveFamily};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::path::PathBuf;
use std::str::FromStr;

/// Fit a parametric envelope curve to a synthesized noisy target.
#[derive(Parser)]
#[command(name = "envfit", version, about)]
struct Cli {
    /// Curve family: adsr, exp, exprel, exprel-index
    #[arg(long, default_value = "adsr", value_parser = CurveFamily::from_str)]
    family: CurveFamily,

    /// Search strategy
    #[arg(long, value_enum, default_value_t = Method::Genetic)]
    method: Method,

    /// Number of samples in the target curve
    #[arg(long, default_value_t = 100)]
    length: usize,

    /// True parameters for the synthesized target (comma separated); drawn
    /// randomly when omitted
    #[arg(long, value_delimiter = ',')]
    params: Option<Vec<f64>>,

    /// Standard deviation of the Gaussian noise added to the target
    #[arg(long, default_value_t = 0.005)]
    noise: f64,

    /// TOML configuration file (estimator and fit sections)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed override for both target synthesis and the estimator
    #[arg(long)]
    seed: Option<u64>,

    /// Write a target-vs-fitted CSV here
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Write the fitted parameter vector as JSON here
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Existing patch document to merge the fitted rates into
    #[arg(long, requires = "patch_out", requires = "slot")]
    patch_in: Option<PathBuf>,

    /// Where to write the merged patch document
    #[arg(long, requires = "patch_in")]
    patch_out: Option<PathBuf>,

    /// Patch slot id receiving the fit
    #[arg(long, requires = "patch_in")]
    slot: Option<u32>,

    /// Oscillator frequency for the patched partial; omit to target the
    /// noise bank instead
    #[arg(long, requires = "patch_in")]
    osc_freq: Option<f64>,

    /// Static gain for the patched partial
    #[arg(long, default_value_t = 1.0)]
    gain: f64,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Genetic population search
    Genetic,
    /// Levenberg-Marquardt least squares (exponential families only)
    Lm,
}

struct LogProgress {
    every: usize,
}

impl ProgressCallback for LogProgress {
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64) {
        if (generation + 1) % self.every == 0 {
            log::info!(
                "generation {}: best fitness {:.6}",
                generation + 1,
                best_fitness
            );
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.estimator.seed = Some(seed);
    }

    if cli.length == 0 {
        bail!("target length must be at least 1");
    }
    if cli.noise < 0.0 {
        bail!("noise standard deviation must be nonnegative");
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let true_params = match cli.params {
        Some(params) => params,
        None => random_true_params(cli.family, &mut rng),
    };
    log::info!("target: {} with params {:?}", cli.family, true_params);

    let clean = curves::generate(cli.family, &true_params, cli.length)?;
    let target = add_noise(&clean, cli.noise, &mut rng);
    let evaluator = FitnessEvaluator::new(target, cli.family)?;

    let fitted = match cli.method {
        Method::Genetic => {
            let mut estimator = GeneticEstimator::new(config.estimator.clone(), &evaluator)?;
            let mut progress = LogProgress { every: 100 };
            estimator.run(&mut progress)?
        }
        Method::Lm => {
            let initial = vec![1.0; cli.family.arity()];
            fit::curve_fit(&evaluator, &initial, &config.fit)?
        }
    };

    let fitted_curve = evaluator.generate(&fitted)?;
    let mse = mean_squared_error(&fitted_curve, &clean);
    println!("{}", render::summary(cli.family, &fitted, mse));

    if let Some(path) = &cli.csv_out {
        render::write_comparison_csv(path, evaluator.target(), &fitted_curve)?;
    }
    if let Some(path) = &cli.json_out {
        patch::write_params(path, &fitted)?;
    }
    if let (Some(input), Some(output), Some(slot)) = (&cli.patch_in, &cli.patch_out, cli.slot) {
        if cli.family == CurveFamily::Adsr {
            bail!("patch slots store exponential (A, B) rate pairs; fit an exp or exprel family");
        }
        let slot_params = patch::SlotParams::single_partial(
            fitted.clone(),
            cli.osc_freq,
            cli.gain,
            cli.length as f64,
        )?;
        patch::update_patch_file(input, output, slot, &slot_params)?;
    }

    Ok(())
}

/// Plausible random target parameters per family: rates in [0, 10),
/// levels and fractions in [0, 1).
fn random_true_params<R: Rng>(family: CurveFamily, rng: &mut R) -> Vec<f64> {
    match family {
        CurveFamily::Adsr => (0..4).map(|_| rng.gen::<f64>()).collect(),
        CurveFamily::Exponential => vec![10.0 * rng.gen::<f64>(), 10.0 * rng.gen::<f64>()],
        CurveFamily::ExpRelaxation { .. } => vec![
            10.0 * rng.gen::<f64>(),
            10.0 * rng.gen::<f64>(),
            rng.gen::<f64>(),
        ],
    }
}

fn add_noise<R: Rng>(curve: &[f64], sigma: f64, rng: &mut R) -> Vec<f64> {
    if sigma == 0.0 {
        return curve.to_vec();
    }
    let normal = Normal::new(0.0, sigma).expect("sigma checked nonnegative");
    curve.iter().map(|v| v + normal.sample(rng)).collect()
}
