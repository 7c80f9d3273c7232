//! Reporting utilities: formatted terminal output for estimation runs.
//!
//! We keep formatting code in one place so:
//! - the math/estimation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! The core only ever hands over structured values (`EstimationResult`,
//! `DatasetStats`, `Trajectory`); everything string-shaped lives here.

use crate::domain::{DatasetStats, EstimateConfig, EstimationResult, Trajectory};

/// Format the run summary (dataset stats + search setup + best point).
pub fn format_run_summary(
    stats: &DatasetStats,
    config: &EstimateConfig,
    result: &EstimationResult,
) -> String {
    let mut out = String::new();

    out.push_str("=== sirfit - SIR grid-search estimation ===\n");
    out.push_str(&format!(
        "Data: n={} | t=[{:.2}, {:.2}] | infected=[{:.2}, {:.2}]\n",
        stats.n_points, stats.t_min, stats.t_max, stats.i_min, stats.i_max
    ));
    out.push_str(&format!(
        "Population: N={:.0} | initial S/I/R = {:.1}/{:.1}/{:.1}\n",
        config.population,
        config.initial.susceptible,
        config.initial.infected,
        config.initial.recovered
    ));
    out.push_str(&format!(
        "Grid: beta=[{}, {}] gamma=[{}, {}] | {} samples/dim ({} cells) | cost={}\n",
        config.beta_range.0,
        config.beta_range.1,
        config.gamma_range.0,
        config.gamma_range.1,
        config.num_samples,
        config.num_samples * config.num_samples,
        config.cost.display_name()
    ));

    out.push_str("\nBest point:\n");
    out.push_str(&format!("- beta  = {:.6}\n", result.best_params.beta));
    out.push_str(&format!("- gamma = {:.6}\n", result.best_params.gamma));
    out.push_str(&format!("- R0    = {:.4}\n", result.best_params.r0()));
    out.push_str(&format!(
        "- {} = {:.6}\n",
        config.cost.display_name(),
        result.best_cost
    ));

    out
}

/// Format an observed-vs-fitted table, downsampled to at most `max_rows` rows.
pub fn format_fit_table(
    times: &[f64],
    observed: &[f64],
    fitted: &[f64],
    max_rows: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>10} {:>14} {:>14} {:>14}\n",
        "t", "observed", "fitted", "residual"
    ));
    out.push_str(&format!("{:->10} {:->14} {:->14} {:->14}\n", "", "", "", ""));

    let n = times.len().min(observed.len()).min(fitted.len());
    if n == 0 || max_rows == 0 {
        return out;
    }

    // Downsample evenly but always include the last row.
    let stride = n.div_ceil(max_rows).max(1);
    let mut rows: Vec<usize> = (0..n).step_by(stride).collect();
    if *rows.last().unwrap_or(&0) != n - 1 {
        rows.push(n - 1);
    }

    for idx in rows {
        out.push_str(&format!(
            "{:>10.2} {:>14.3} {:>14.3} {:>14.3}\n",
            times[idx],
            observed[idx],
            fitted[idx],
            observed[idx] - fitted[idx]
        ));
    }

    out
}

/// Format a simulated trajectory, downsampled to at most `max_rows` rows.
pub fn format_trajectory(trajectory: &Trajectory, max_rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>10} {:>14} {:>14} {:>14}\n",
        "t", "S", "I", "R"
    ));
    out.push_str(&format!("{:->10} {:->14} {:->14} {:->14}\n", "", "", "", ""));

    let n = trajectory.len();
    if n == 0 || max_rows == 0 {
        return out;
    }

    let stride = n.div_ceil(max_rows).max(1);
    let mut rows: Vec<usize> = (0..n).step_by(stride).collect();
    if *rows.last().unwrap_or(&0) != n - 1 {
        rows.push(n - 1);
    }

    let times = trajectory.times();
    let states = trajectory.states();
    for idx in rows {
        let s = &states[idx];
        out.push_str(&format!(
            "{:>10.2} {:>14.3} {:>14.3} {:>14.3}\n",
            times[idx], s.susceptible, s.infected, s.recovered
        ));
    }

    if let Some((t, i)) = trajectory.peak_infected() {
        out.push_str(&format!("\nPeak infected: {i:.3} at t={t:.2}\n"));
    }

    out
}
