use crate::config::FitConfig;
use crate::error::{EnvfitError, Result};
use crate::fitness::FitnessEvaluator;
use crate::types::{CurveFamily, ParamVector};

/// Forward-difference step for the Jacobian.
const JACOBIAN_STEP: f64 = 1e-6;
/// Damping factor beyond which the search is considered stuck.
const LAMBDA_LIMIT: f64 = 1e12;

/// Levenberg-Marquardt fit of an exponential-family curve to the evaluator's
/// target, starting from `initial`.
///
/// The evaluator's generator is the model function; residuals are
/// `model - target`, the Jacobian comes from forward finite differences, and
/// each step solves the damped normal equations directly (arity is at most
/// 3). The ADSR family is rejected: its integer segment boundaries make the
/// model non-differentiable.
pub fn curve_fit(
    evaluator: &FitnessEvaluator,
    initial: &[f64],
    config: &FitConfig,
) -> Result<ParamVector> {
    if evaluator.family() == CurveFamily::Adsr {
        return Err(EnvfitError::UnsupportedFamily(
            "ADSR (not differentiable; use the genetic estimator)".to_string(),
        ));
    }

    let mut params = initial.to_vec();
    let mut residuals = residuals_at(evaluator, &params)?;
    let mut cost = sum_of_squares(&residuals);
    let mut lambda = config.initial_lambda;
    let mut improved = false;

    for iteration in 0..config.max_iterations {
        let jacobian = jacobian_at(evaluator, &params, &residuals)?;
        let n = params.len();

        // Damped normal equations: (J^T J + lambda diag(J^T J)) delta = J^T r
        let mut jtj = vec![vec![0.0; n]; n];
        let mut jtr = vec![0.0; n];
        for (row, &r) in jacobian.iter().zip(&residuals) {
            for j in 0..n {
                jtr[j] += row[j] * r;
                for k in 0..n {
                    jtj[j][k] += row[j] * row[k];
                }
            }
        }
        for j in 0..n {
            jtj[j][j] += lambda * jtj[j][j].max(f64::MIN_POSITIVE);
        }

        let step = match solve(jtj, jtr) {
            Some(delta) => delta,
            None => {
                // Singular system; raise damping and retry.
                lambda *= 10.0;
                if lambda > LAMBDA_LIMIT {
                    return stalled(params, improved, iteration);
                }
                continue;
            }
        };

        let candidate: ParamVector = params.iter().zip(&step).map(|(p, d)| p - d).collect();
        match residuals_at(evaluator, &candidate) {
            Ok(candidate_residuals) => {
                let candidate_cost = sum_of_squares(&candidate_residuals);
                if candidate_cost < cost {
                    let improvement = cost - candidate_cost;
                    params = candidate;
                    residuals = candidate_residuals;
                    cost = candidate_cost;
                    lambda = (lambda / 10.0).max(1e-12);
                    improved = true;
                    log::trace!(
                        "lm iteration {iteration}: cost {cost:.3e}, lambda {lambda:.1e}"
                    );
                    if improvement < config.tolerance * cost.max(config.tolerance) {
                        return Ok(params);
                    }
                    continue;
                }
            }
            // A step outside the model's domain counts as a rejected step.
            Err(EnvfitError::DegenerateParams(_)) => {}
            Err(e) => return Err(e),
        }

        lambda *= 10.0;
        if lambda > LAMBDA_LIMIT {
            return stalled(params, improved, iteration);
        }
    }

    Err(EnvfitError::NoConvergence {
        iterations: config.max_iterations,
    })
}

/// A stalled search (damping maxed out) at an improved point is a local
/// minimum at finite-difference precision; a stall that never improved on
/// the initial guess is a failure.
fn stalled(params: ParamVector, improved: bool, iteration: usize) -> Result<ParamVector> {
    if improved {
        Ok(params)
    } else {
        Err(EnvfitError::NoConvergence {
            iterations: iteration,
        })
    }
}

fn residuals_at(evaluator: &FitnessEvaluator, params: &[f64]) -> Result<Vec<f64>> {
    let curve = evaluator.generate(params)?;
    Ok(curve
        .iter()
        .zip(evaluator.target())
        .map(|(c, t)| c - t)
        .collect())
}

fn jacobian_at(
    evaluator: &FitnessEvaluator,
    params: &[f64],
    residuals: &[f64],
) -> Result<Vec<Vec<f64>>> {
    let n = params.len();
    let mut columns = Vec::with_capacity(n);
    for j in 0..n {
        let h = JACOBIAN_STEP * params[j].abs().max(1.0);
        let mut bumped = params.to_vec();
        bumped[j] += h;
        let bumped_residuals = match residuals_at(evaluator, &bumped) {
            Ok(r) => r,
            // Bumping past the domain edge (e.g. relaxation fraction past
            // 1.0): difference backward instead.
            Err(EnvfitError::DegenerateParams(_)) => {
                bumped[j] = params[j] - h;
                let back = residuals_at(evaluator, &bumped)?;
                columns.push(
                    residuals
                        .iter()
                        .zip(&back)
                        .map(|(r, b)| (r - b) / h)
                        .collect::<Vec<f64>>(),
                );
                continue;
            }
            Err(e) => return Err(e),
        };
        columns.push(
            bumped_residuals
                .iter()
                .zip(residuals)
                .map(|(b, r)| (b - r) / h)
                .collect::<Vec<f64>>(),
        );
    }

    // Transpose columns into per-sample rows.
    let rows = residuals.len();
    Ok((0..rows)
        .map(|i| (0..n).map(|j| columns[j][i]).collect())
        .collect())
}

fn sum_of_squares(residuals: &[f64]) -> f64 {
    residuals.iter().map(|r| r * r).sum()
}

/// Gaussian elimination with partial pivoting; `None` on a singular system.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < 1e-300 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }
    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
