//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads or generates the observed dataset
//! - runs the grid-search estimation
//! - prints reports

use clap::Parser;

use crate::cli::{Command, FitArgs, SimulateArgs};
use crate::domain::{CompartmentState, EstimateConfig, ParameterPoint};
use crate::error::AppError;
use crate::math::Rk45Options;
use crate::models::SirModel;

pub mod pipeline;

use pipeline::{DataSource, RunConfig};

/// Entry point for the `sirfit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Simulate(args) => handle_simulate(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    for row_error in &run.row_errors {
        eprintln!("warning: line {}: {}", row_error.line, row_error.message);
    }

    println!(
        "{}",
        crate::report::format_run_summary(&run.stats, &config.estimate, &run.result)
    );

    if args.table {
        println!(
            "{}",
            crate::report::format_fit_table(
                &run.dataset.times,
                &run.dataset.infected,
                &run.result.best_fit,
                args.table_rows,
            )
        );
    }

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    if args.points == 0 {
        return Err(AppError::invalid_input("Sample point count must be > 0."));
    }

    let initial = initial_state(args.population, args.i0, args.r0);
    let model = SirModel::new(args.population, ParameterPoint::new(args.beta, args.gamma));
    let times: Vec<f64> = (0..args.points).map(|i| i as f64).collect();

    let trajectory = model
        .simulate(&initial, &times, &Rk45Options::default())
        .ok_or_else(|| {
            AppError::numeric(format!(
                "Integration failed for beta={}, gamma={}.",
                args.beta, args.gamma
            ))
        })?;

    println!(
        "{}",
        crate::report::format_trajectory(&trajectory, args.table_rows)
    );
    Ok(())
}

pub fn run_config_from_args(args: &FitArgs) -> RunConfig {
    let initial = initial_state(args.population, args.i0, args.r0);

    let source = match &args.data {
        Some(path) => DataSource::Csv(path.clone()),
        None => DataSource::Synthetic(crate::data::SampleSpec {
            population: args.population,
            initial,
            true_params: ParameterPoint::new(args.true_beta, args.true_gamma),
            n_points: args.points,
            noise: args.noise,
            seed: args.seed,
        }),
    };

    RunConfig {
        source,
        estimate: EstimateConfig {
            population: args.population,
            initial,
            beta_range: (args.beta_min, args.beta_max),
            gamma_range: (args.gamma_min, args.gamma_max),
            num_samples: args.samples,
            cost: args.cost,
            failure_policy: args.on_failure,
        },
    }
}

fn initial_state(population: f64, i0: f64, r0: f64) -> CompartmentState {
    CompartmentState::new(population - i0 - r0, i0, r0)
}
