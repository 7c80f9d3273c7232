//! Brute-force grid-search estimation of (beta, gamma).
//!
//! Given:
//! - observed infected counts `data_i` on a time grid `t_i`
//! - a rectangular (beta, gamma) search region and a per-dimension resolution
//! - a cost function
//!
//! we simulate the SIR system at every grid cell, score the simulated infected
//! curve against the observations, and keep the minimizing cell.
//!
//! Determinism contract: cells are evaluated in outer-beta/inner-gamma
//! ascending order (by flat index) and selection uses strict `<`, so the first
//! encountered minimum wins on ties. Evaluation runs in parallel, but each
//! cell is a pure function of its inputs and candidates are collected in grid
//! order, so the selected cell is identical to a sequential sweep.

use rayon::prelude::*;

use crate::domain::{Dataset, EstimateConfig, EstimationResult, FailurePolicy, ParameterPoint};
use crate::error::AppError;
use crate::fit::grid::ParameterGrid;
use crate::math::Rk45Options;
use crate::models::SirModel;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    idx: usize,
    params: ParameterPoint,
    cost: f64,
}

/// Run a grid-search estimation with default solver tolerances.
pub fn estimate(dataset: &Dataset, config: &EstimateConfig) -> Result<EstimationResult, AppError> {
    estimate_with_solver(dataset, config, &Rk45Options::default())
}

/// Run a grid-search estimation with explicit solver tolerances.
pub fn estimate_with_solver(
    dataset: &Dataset,
    config: &EstimateConfig,
    solver: &Rk45Options,
) -> Result<EstimationResult, AppError> {
    validate_inputs(dataset, config)?;

    let grid = ParameterGrid::new(config.beta_range, config.gamma_range, config.num_samples)?;
    let cells = grid.cells();

    // Evaluate each cell independently (parallel). The collect preserves grid
    // order, so the later reduction sees candidates exactly as a sequential
    // outer-beta/inner-gamma sweep would.
    let outcomes: Result<Vec<Option<Candidate>>, AppError> = cells
        .par_iter()
        .map(|&(idx, params)| evaluate_cell(idx, params, dataset, config, solver))
        .collect();
    let candidates: Vec<Candidate> = outcomes?.into_iter().flatten().collect();

    if candidates.is_empty() {
        return Err(AppError::numeric(
            "Integration failed for every grid cell; no candidates to select from.",
        ));
    }

    // Deterministic selection: minimum cost, ties broken by original grid index.
    let mut best = &candidates[0];
    for c in &candidates[1..] {
        if c.cost < best.cost || (c.cost == best.cost && c.idx < best.idx) {
            best = c;
        }
    }

    // Recompute the winning trajectory; candidates only carry (idx, params, cost).
    let model = SirModel::new(config.population, best.params);
    let best_fit = model
        .simulate(&config.initial, &dataset.times, solver)
        .ok_or_else(|| AppError::numeric("Integration failed while recomputing the best fit."))?
        .infected();

    Ok(EstimationResult {
        best_params: best.params,
        best_cost: best.cost,
        best_fit,
    })
}

fn evaluate_cell(
    idx: usize,
    params: ParameterPoint,
    dataset: &Dataset,
    config: &EstimateConfig,
    solver: &Rk45Options,
) -> Result<Option<Candidate>, AppError> {
    let model = SirModel::new(config.population, params);
    let Some(trajectory) = model.simulate(&config.initial, &dataset.times, solver) else {
        return match config.failure_policy {
            // A failed cell contributes nothing to the minimum (cost = +inf).
            FailurePolicy::Skip => Ok(None),
            FailurePolicy::Error => Err(AppError::numeric(format!(
                "Integration failed at beta={}, gamma={}.",
                params.beta, params.gamma
            ))),
        };
    };

    let cost = config.cost.score(&dataset.infected, &trajectory.infected());
    if cost.is_finite() {
        Ok(Some(Candidate { idx, params, cost }))
    } else {
        Ok(None)
    }
}

/// Pre-simulation validation; the simulator is never invoked on bad inputs.
fn validate_inputs(dataset: &Dataset, config: &EstimateConfig) -> Result<(), AppError> {
    if dataset.infected.len() != dataset.times.len() {
        return Err(AppError::invalid_input(format!(
            "Data/time length mismatch: {} observations vs {} times.",
            dataset.infected.len(),
            dataset.times.len()
        )));
    }
    if dataset.is_empty() {
        return Err(AppError::invalid_input("Dataset is empty."));
    }
    if dataset.infected.iter().any(|v| !v.is_finite()) {
        return Err(AppError::invalid_input("Observed data contains non-finite values."));
    }
    for w in dataset.times.windows(2) {
        if !(w[0].is_finite() && w[1].is_finite() && w[1] > w[0]) {
            return Err(AppError::invalid_input(
                "Time grid must be finite and strictly increasing.",
            ));
        }
    }
    if config.num_samples < 1 {
        return Err(AppError::invalid_input("num_samples must be >= 1."));
    }
    // Malformed ranges are also caught here (before any simulation) rather
    // than deep inside grid construction.
    for (name, (low, high)) in [("beta", config.beta_range), ("gamma", config.gamma_range)] {
        if !(low.is_finite() && high.is_finite() && low <= high) {
            return Err(AppError::invalid_input(format!(
                "Invalid {name} range: ({low}, {high})."
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompartmentState, CostKind};

    fn day_grid(days: usize) -> Vec<f64> {
        (0..days).map(|i| i as f64).collect()
    }

    fn config(
        beta_range: (f64, f64),
        gamma_range: (f64, f64),
        num_samples: usize,
    ) -> EstimateConfig {
        EstimateConfig {
            population: 1000.0,
            initial: CompartmentState::new(999.0, 1.0, 0.0),
            beta_range,
            gamma_range,
            num_samples,
            cost: CostKind::Sse,
            failure_policy: FailurePolicy::Skip,
        }
    }

    /// Clean dataset produced by the simulator itself at the given parameters.
    fn planted_dataset(cfg: &EstimateConfig, beta: f64, gamma: f64, days: usize) -> Dataset {
        let times = day_grid(days);
        let model = SirModel::new(cfg.population, ParameterPoint::new(beta, gamma));
        let infected = model
            .simulate(&cfg.initial, &times, &Rk45Options::default())
            .unwrap()
            .infected();
        Dataset { times, infected }
    }

    #[test]
    fn recovers_planted_parameters_within_one_grid_step() {
        let cfg = config((0.1, 0.2), (0.01, 0.02), 10);
        let data = planted_dataset(&cfg, 0.15, 0.015, 160);

        let result = estimate(&data, &cfg).unwrap();
        let grid = ParameterGrid::new(cfg.beta_range, cfg.gamma_range, cfg.num_samples).unwrap();
        let (db, dg) = grid.step();

        assert!(
            (result.best_params.beta - 0.15).abs() <= db + 1e-12,
            "beta {} not within one step of 0.15",
            result.best_params.beta
        );
        assert!(
            (result.best_params.gamma - 0.015).abs() <= dg + 1e-12,
            "gamma {} not within one step of 0.015",
            result.best_params.gamma
        );

        // Grid resolution is fine enough that the residual fit is small
        // relative to the observed scale.
        let peak = data.infected.iter().cloned().fold(0.0, f64::max);
        let rmse = (result.best_cost / data.len() as f64).sqrt();
        assert!(rmse < 0.1 * peak, "rmse {rmse} too large for peak {peak}");
    }

    #[test]
    fn recovers_exact_on_grid_parameters_with_zero_cost() {
        let cfg = config((0.1, 0.2), (0.01, 0.02), 11);
        let grid = ParameterGrid::new(cfg.beta_range, cfg.gamma_range, cfg.num_samples).unwrap();
        // Plant at actual grid values so the winning cell reproduces the data
        // through the identical simulation path.
        let beta = grid.beta_values[5];
        let gamma = grid.gamma_values[5];
        let data = planted_dataset(&cfg, beta, gamma, 160);

        let result = estimate(&data, &cfg).unwrap();
        assert_eq!(result.best_params.beta, beta);
        assert_eq!(result.best_params.gamma, gamma);
        assert_eq!(result.best_cost, 0.0);
        assert_eq!(result.best_fit, data.infected);
    }

    #[test]
    fn estimation_is_deterministic_across_runs() {
        let cfg = config((0.1, 0.6), (0.05, 0.3), 8);
        let data = planted_dataset(&cfg, 0.4, 0.12, 120);

        let a = estimate(&data, &cfg).unwrap();
        let b = estimate(&data, &cfg).unwrap();
        assert_eq!(a.best_params.beta, b.best_params.beta);
        assert_eq!(a.best_params.gamma, b.best_params.gamma);
        assert_eq!(a.best_cost, b.best_cost);
        assert_eq!(a.best_fit, b.best_fit);
    }

    #[test]
    fn first_seen_minimum_wins_on_ties() {
        // With no initial infections, every (beta, gamma) produces the same
        // flat-zero infected curve, so every cell has identical cost and the
        // first cell in outer-beta/inner-gamma order must win.
        let mut cfg = config((0.1, 0.2), (0.01, 0.02), 3);
        cfg.initial = CompartmentState::new(1000.0, 0.0, 0.0);
        let times = day_grid(20);
        let data = Dataset {
            infected: vec![0.0; times.len()],
            times,
        };

        let result = estimate(&data, &cfg).unwrap();
        assert_eq!(result.best_params.beta, 0.1);
        assert_eq!(result.best_params.gamma, 0.01);
        assert_eq!(result.best_cost, 0.0);
    }

    #[test]
    fn single_sample_evaluates_range_lower_bound() {
        let cfg = config((0.1, 0.2), (0.01, 0.02), 1);
        let data = planted_dataset(&cfg, 0.15, 0.015, 40);

        let result = estimate(&data, &cfg).unwrap();
        assert_eq!(result.best_params.beta, 0.1);
        assert_eq!(result.best_params.gamma, 0.01);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let cfg = config((0.1, 0.2), (0.01, 0.02), 3);
        let data = Dataset {
            times: vec![0.0, 1.0, 2.0],
            infected: vec![1.0, 2.0],
        };
        let err = estimate(&data, &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn rejects_zero_samples() {
        let cfg = config((0.1, 0.2), (0.01, 0.02), 0);
        let data = planted_dataset(&config((0.1, 0.2), (0.01, 0.02), 1), 0.15, 0.015, 10);
        let err = estimate(&data, &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn rejects_reversed_range() {
        let mut cfg = config((0.2, 0.1), (0.01, 0.02), 3);
        cfg.failure_policy = FailurePolicy::Error;
        let data = planted_dataset(&config((0.1, 0.2), (0.01, 0.02), 1), 0.15, 0.015, 10);
        let err = estimate(&data, &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn rejects_non_increasing_times() {
        let cfg = config((0.1, 0.2), (0.01, 0.02), 3);
        let data = Dataset {
            times: vec![0.0, 1.0, 1.0],
            infected: vec![1.0, 2.0, 3.0],
        };
        let err = estimate(&data, &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn integrator_failure_respects_policy() {
        // Population 0 makes the force of infection S*I/N non-finite at the
        // very first derivative evaluation, so every cell fails.
        let mut cfg = config((0.1, 0.2), (0.01, 0.02), 2);
        cfg.population = 0.0;
        let data = Dataset {
            times: day_grid(5),
            infected: vec![1.0; 5],
        };

        // Skip: all cells fail, so there is nothing to select from.
        let err = estimate(&data, &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 4);

        // Error: the first failing cell aborts the run.
        cfg.failure_policy = FailurePolicy::Error;
        let err = estimate(&data, &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
