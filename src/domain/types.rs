//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during estimation
//! - handed to external reporting/plotting collaborators in structured form
//! - reconstructed later for comparisons

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Cost function used to score a predicted infected curve against observations.
///
/// All variants map two equal-length numeric sequences to one real score,
/// lower is better. The signed-error variants use `observed - predicted`, so a
/// model that over-predicts scores negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CostKind {
    /// Mean squared error.
    Mse,
    /// Sum of squared errors.
    Sse,
    /// Mean absolute error.
    Mae,
    /// Sum of absolute errors.
    Sae,
    /// Mean signed error (bias).
    Me,
    /// Sum of signed errors.
    Se,
}

impl CostKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            CostKind::Mse => "MSE",
            CostKind::Sse => "SSE",
            CostKind::Mae => "MAE",
            CostKind::Sae => "SAE",
            CostKind::Me => "ME",
            CostKind::Se => "SE",
        }
    }
}

/// What to do when the ODE integrator fails for a single grid cell.
///
/// Grid search should normally be robust to isolated pathological parameter
/// pairs, so the default treats a failed cell as cost = +infinity and keeps
/// searching. `Error` aborts the whole estimation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Skip the failed cell; it simply never becomes a candidate.
    Skip,
    /// Abort the estimation on the first failed cell.
    Error,
}

/// SIR compartment counts at a single point in time.
///
/// Invariant: `susceptible + infected + recovered` equals the total population
/// exactly for the continuous system and approximately (integrator tolerance)
/// for numerical trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompartmentState {
    pub susceptible: f64,
    pub infected: f64,
    pub recovered: f64,
}

impl CompartmentState {
    pub fn new(susceptible: f64, infected: f64, recovered: f64) -> Self {
        Self {
            susceptible,
            infected,
            recovered,
        }
    }

    /// Total population implied by this state.
    pub fn total(&self) -> f64 {
        self.susceptible + self.infected + self.recovered
    }
}

/// One simulated SIR run, sampled at the caller's requested time points.
#[derive(Debug, Clone, Serialize)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<CompartmentState>,
}

impl Trajectory {
    /// Build a trajectory from parallel time/state vectors.
    ///
    /// # Panics
    /// Panics if the vectors have different lengths. The simulator always
    /// produces matching lengths; this guards library misuse.
    pub fn new(times: Vec<f64>, states: Vec<CompartmentState>) -> Self {
        assert_eq!(times.len(), states.len(), "times/states length mismatch");
        Self { times, states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[CompartmentState] {
        &self.states
    }

    /// Infected counts, one per sampled time.
    pub fn infected(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.infected).collect()
    }

    /// Susceptible counts, one per sampled time.
    pub fn susceptible(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.susceptible).collect()
    }

    /// Recovered counts, one per sampled time.
    pub fn recovered(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.recovered).collect()
    }

    /// `(time, infected)` at the sampled infected peak, if any samples exist.
    pub fn peak_infected(&self) -> Option<(f64, f64)> {
        self.times
            .iter()
            .zip(self.states.iter())
            .map(|(&t, s)| (t, s.infected))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// A single (beta, gamma) candidate in parameter space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterPoint {
    /// Transmission rate (per-contact infection rate).
    pub beta: f64,
    /// Recovery rate (1 / infectious period).
    pub gamma: f64,
}

impl ParameterPoint {
    pub fn new(beta: f64, gamma: f64) -> Self {
        Self { beta, gamma }
    }

    /// Basic reproduction number R0 = beta / gamma.
    pub fn r0(&self) -> f64 {
        self.beta / self.gamma
    }
}

/// Observed infected counts paired with their sample times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub times: Vec<f64>,
    pub infected: Vec<f64>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.infected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infected.is_empty()
    }

    /// Summary stats for reporting. `None` for an empty dataset.
    pub fn stats(&self) -> Option<DatasetStats> {
        if self.is_empty() || self.times.is_empty() {
            return None;
        }
        let (mut i_min, mut i_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &v in &self.infected {
            i_min = i_min.min(v);
            i_max = i_max.max(v);
        }
        Some(DatasetStats {
            n_points: self.len(),
            t_min: self.times[0],
            t_max: self.times[self.times.len() - 1],
            i_min,
            i_max,
        })
    }
}

/// Summary stats about the observations actually used for estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub t_min: f64,
    pub t_max: f64,
    pub i_min: f64,
    pub i_max: f64,
}

/// Scalar configuration for one estimation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateConfig {
    /// Total population N.
    pub population: f64,
    /// Compartment counts at the first sample time.
    pub initial: CompartmentState,
    /// Inclusive (low, high) range for beta.
    pub beta_range: (f64, f64),
    /// Inclusive (low, high) range for gamma.
    pub gamma_range: (f64, f64),
    /// Grid resolution per dimension (total cells = num_samples^2).
    pub num_samples: usize,
    /// Cost function used to score each cell.
    pub cost: CostKind,
    /// Behavior when the integrator fails for a cell.
    pub failure_policy: FailurePolicy,
}

/// Best grid point found by the estimator.
///
/// Fields are structured (not formatted text) so reporting and plotting
/// collaborators can format independently.
#[derive(Debug, Clone, Serialize)]
pub struct EstimationResult {
    /// The winning (beta, gamma) pair.
    pub best_params: ParameterPoint,
    /// Cost of the winning pair under the configured cost function.
    pub best_cost: f64,
    /// Predicted infected counts at the winning pair, one per sample time.
    pub best_fit: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compartment_total_sums_counts() {
        let s = CompartmentState::new(999.0, 1.0, 0.0);
        assert!((s.total() - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn parameter_point_r0() {
        let p = ParameterPoint::new(0.5, 0.2);
        assert!((p.r0() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn trajectory_peak_infected() {
        let times = vec![0.0, 1.0, 2.0];
        let states = vec![
            CompartmentState::new(99.0, 1.0, 0.0),
            CompartmentState::new(90.0, 8.0, 2.0),
            CompartmentState::new(85.0, 5.0, 10.0),
        ];
        let traj = Trajectory::new(times, states);
        let (t, i) = traj.peak_infected().unwrap();
        assert!((t - 1.0).abs() < 1e-12);
        assert!((i - 8.0).abs() < 1e-12);
    }

    #[test]
    fn dataset_stats_basic() {
        let ds = Dataset {
            times: vec![0.0, 1.0, 2.0],
            infected: vec![1.0, 5.0, 3.0],
        };
        let stats = ds.stats().unwrap();
        assert_eq!(stats.n_points, 3);
        assert!((stats.t_max - 2.0).abs() < 1e-12);
        assert!((stats.i_max - 5.0).abs() < 1e-12);
        assert!((stats.i_min - 1.0).abs() < 1e-12);
    }
}
