//! Command-line parsing for the SIR grid-search fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{CostKind, FailurePolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sirfit", version, about = "SIR parameter estimation by brute-force grid search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit (beta, gamma) to observed infected counts and print the best point.
    ///
    /// Reads observations from `--data` if given; otherwise generates a seeded
    /// synthetic outbreak from `--true-beta`/`--true-gamma` so the tool works
    /// with zero setup.
    Fit(FitArgs),
    /// Simulate the SIR model at fixed parameters and print the trajectory.
    Simulate(SimulateArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// CSV with a time column (`t`/`time`/`day`) and an infected column
    /// (`i`/`infected`/`cases`). Omit to use a synthetic dataset.
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Total population N.
    #[arg(short = 'N', long, default_value_t = 1000.0)]
    pub population: f64,

    /// Initial infected count I0 (S0 = N - I0 - R0).
    #[arg(long, default_value_t = 1.0)]
    pub i0: f64,

    /// Initial recovered count R0.
    #[arg(long, default_value_t = 0.0)]
    pub r0: f64,

    /// Minimum beta (transmission rate) for grid search.
    #[arg(long, default_value_t = 0.1)]
    pub beta_min: f64,

    /// Maximum beta for grid search.
    #[arg(long, default_value_t = 1.0)]
    pub beta_max: f64,

    /// Minimum gamma (recovery rate) for grid search.
    #[arg(long, default_value_t = 0.01)]
    pub gamma_min: f64,

    /// Maximum gamma for grid search.
    #[arg(long, default_value_t = 0.5)]
    pub gamma_max: f64,

    /// Grid samples per dimension (total cells = samples^2).
    #[arg(short = 'n', long, default_value_t = 50)]
    pub samples: usize,

    /// Cost function to minimize.
    #[arg(long, value_enum, default_value_t = CostKind::Sse)]
    pub cost: CostKind,

    /// What to do when the integrator fails for a grid cell.
    #[arg(long, value_enum, default_value_t = FailurePolicy::Skip)]
    pub on_failure: FailurePolicy,

    /// True beta used when generating a synthetic dataset.
    #[arg(long, default_value_t = 0.5)]
    pub true_beta: f64,

    /// True gamma used when generating a synthetic dataset.
    #[arg(long, default_value_t = 0.2)]
    pub true_gamma: f64,

    /// Relative observation noise for the synthetic dataset (0 = none).
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Random seed for synthetic noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of daily samples in the synthetic dataset.
    #[arg(long, default_value_t = 160)]
    pub points: usize,

    /// Print an observed-vs-fitted table after the summary.
    #[arg(long)]
    pub table: bool,

    /// Maximum rows in the observed-vs-fitted table.
    #[arg(long, default_value_t = 20)]
    pub table_rows: usize,
}

/// Options for forward simulation.
#[derive(Debug, Parser)]
pub struct SimulateArgs {
    /// Total population N.
    #[arg(short = 'N', long, default_value_t = 1000.0)]
    pub population: f64,

    /// Initial infected count I0 (S0 = N - I0 - R0).
    #[arg(long, default_value_t = 1.0)]
    pub i0: f64,

    /// Initial recovered count R0.
    #[arg(long, default_value_t = 0.0)]
    pub r0: f64,

    /// Transmission rate beta.
    #[arg(long, default_value_t = 0.5)]
    pub beta: f64,

    /// Recovery rate gamma.
    #[arg(long, default_value_t = 0.2)]
    pub gamma: f64,

    /// Number of daily samples, starting at t = 0.
    #[arg(long, default_value_t = 160)]
    pub points: usize,

    /// Maximum rows in the trajectory table.
    #[arg(long, default_value_t = 20)]
    pub table_rows: usize,
}
