//! Parameter grid generation.
//!
//! We estimate (beta, gamma) using a deterministic grid search.
//!
//! Why grid search?
//! - It avoids local minima issues common in nonlinear optimization.
//! - It is deterministic given the same inputs/flags.
//! - With two parameters, a modest grid is fast enough for teaching runs,
//!   and the exhaustive sweep makes the cost landscape easy to reason about.

use crate::domain::ParameterPoint;
use crate::error::AppError;

/// Generate `num_samples` evenly spaced points between `low` and `high`,
/// inclusive of both endpoints.
///
/// `num_samples == 1` yields just `low` (linspace-of-one semantics), so a
/// degenerate grid evaluates the range's lower bound.
pub fn lin_space(low: f64, high: f64, num_samples: usize) -> Result<Vec<f64>, AppError> {
    if !(low.is_finite() && high.is_finite() && low <= high) {
        return Err(AppError::invalid_input(format!(
            "Invalid range: low={low}, high={high} (must be finite and low <= high)."
        )));
    }
    if num_samples < 1 {
        return Err(AppError::invalid_input("num_samples must be >= 1."));
    }
    if num_samples == 1 {
        return Ok(vec![low]);
    }

    let step = (high - low) / (num_samples as f64 - 1.0);
    let mut out = Vec::with_capacity(num_samples);
    for i in 0..num_samples {
        out.push(low + step * i as f64);
    }
    Ok(out)
}

/// The rectangular (beta, gamma) search grid for one estimation run.
///
/// Constructed once per run and read-only thereafter.
#[derive(Debug, Clone)]
pub struct ParameterGrid {
    pub beta_values: Vec<f64>,
    pub gamma_values: Vec<f64>,
}

impl ParameterGrid {
    pub fn new(
        beta_range: (f64, f64),
        gamma_range: (f64, f64),
        num_samples: usize,
    ) -> Result<Self, AppError> {
        Ok(Self {
            beta_values: lin_space(beta_range.0, beta_range.1, num_samples)?,
            gamma_values: lin_space(gamma_range.0, gamma_range.1, num_samples)?,
        })
    }

    /// Number of cells in the full grid.
    pub fn len(&self) -> usize {
        self.beta_values.len() * self.gamma_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid spacing per dimension (0 for single-sample dimensions).
    pub fn step(&self) -> (f64, f64) {
        let step_of = |v: &[f64]| if v.len() < 2 { 0.0 } else { v[1] - v[0] };
        (step_of(&self.beta_values), step_of(&self.gamma_values))
    }

    /// All cells in iteration order: outer beta ascending, inner gamma
    /// ascending. The flat index is the tie-break key for selection.
    pub fn cells(&self) -> Vec<(usize, ParameterPoint)> {
        let mut out = Vec::with_capacity(self.len());
        for &beta in &self.beta_values {
            for &gamma in &self.gamma_values {
                out.push((out.len(), ParameterPoint::new(beta, gamma)));
            }
        }
        out
    }
}
