//! Forward simulation of the SIR system.
//!
//! Dynamics (continuous time, N / beta / gamma constant over the run):
//!
//! ```text
//! dS/dt = -beta * S * I / N
//! dI/dt =  beta * S * I / N - gamma * I
//! dR/dt =  gamma * I
//! ```
//!
//! The simulator is stateless and pure: one invocation integrates the system
//! over the caller's time grid and returns a `Trajectory` sampled exactly at
//! those times. It performs no input validation beyond what integration
//! itself detects; validating ranges/grids is the estimator's job.

use nalgebra::Vector3;

use crate::domain::{CompartmentState, ParameterPoint, Trajectory};
use crate::math::{Rk45Options, integrate};

/// One SIR parameterization, fixed for the whole integration.
#[derive(Debug, Clone, Copy)]
pub struct SirModel {
    /// Total population N.
    pub population: f64,
    /// Transmission rate beta.
    pub beta: f64,
    /// Recovery rate gamma.
    pub gamma: f64,
}

impl SirModel {
    pub fn new(population: f64, params: ParameterPoint) -> Self {
        Self {
            population,
            beta: params.beta,
            gamma: params.gamma,
        }
    }

    /// Basic reproduction number R0 = beta / gamma.
    pub fn r0(&self) -> f64 {
        self.beta / self.gamma
    }

    /// Right-hand side of the SIR system at a given state.
    pub fn derivatives(&self, state: &Vector3<f64>) -> Vector3<f64> {
        let (s, i) = (state[0], state[1]);
        let infection = self.beta * s * i / self.population;
        let recovery = self.gamma * i;
        Vector3::new(-infection, infection - recovery, recovery)
    }

    /// Integrate the system and sample at each entry of `times`.
    ///
    /// `times[0]` is the initial time and maps to `initial` itself. Returns
    /// `None` if the integrator fails to converge; callers decide whether
    /// that skips a grid cell or aborts the run.
    pub fn simulate(
        &self,
        initial: &CompartmentState,
        times: &[f64],
        opts: &Rk45Options,
    ) -> Option<Trajectory> {
        let y0 = Vector3::new(initial.susceptible, initial.infected, initial.recovered);
        let states = integrate(|_, y| self.derivatives(y), times, y0, opts)?;

        let states = states
            .into_iter()
            .map(|y| CompartmentState::new(y[0], y[1], y[2]))
            .collect();
        Some(Trajectory::new(times.to_vec(), states))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_grid(days: usize) -> Vec<f64> {
        (0..days).map(|i| i as f64).collect()
    }

    fn textbook_model() -> (SirModel, CompartmentState) {
        let model = SirModel::new(1000.0, ParameterPoint::new(0.5, 0.2));
        let initial = CompartmentState::new(999.0, 1.0, 0.0);
        (model, initial)
    }

    #[test]
    fn population_is_conserved_at_every_sample() {
        let (model, initial) = textbook_model();
        let times = day_grid(160);
        let traj = model.simulate(&initial, &times, &Rk45Options::default()).unwrap();

        assert_eq!(traj.len(), 160);
        for state in traj.states() {
            let rel = (state.total() - 1000.0).abs() / 1000.0;
            assert!(rel < 1e-6, "conservation violated: total={}", state.total());
        }
    }

    #[test]
    fn susceptible_decreases_and_recovered_increases() {
        let (model, initial) = textbook_model();
        let times = day_grid(160);
        let traj = model.simulate(&initial, &times, &Rk45Options::default()).unwrap();

        let s = traj.susceptible();
        let r = traj.recovered();
        for w in s.windows(2) {
            assert!(w[1] <= w[0] + 1e-9, "S increased: {} -> {}", w[0], w[1]);
        }
        for w in r.windows(2) {
            assert!(w[1] >= w[0] - 1e-9, "R decreased: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn epidemic_rises_peaks_and_decays() {
        // Textbook burnout scenario: N=1000, S0=999, I0=1, beta=0.5, gamma=0.2.
        let (model, initial) = textbook_model();
        let times = day_grid(160);
        let traj = model.simulate(&initial, &times, &Rk45Options::default()).unwrap();

        let infected = traj.infected();
        let (peak_t, peak_i) = traj.peak_infected().unwrap();

        assert!(peak_i > initial.infected, "peak {peak_i} should exceed I0");
        assert!(peak_t > 0.0 && peak_t < 159.0, "peak inside the window, got {peak_t}");
        assert!(infected[0] < peak_i);
        let last = *infected.last().unwrap();
        assert!(last < peak_i, "curve should decay after the peak");
        assert!(last > 0.0, "infected stays positive (burnout, not extinction)");
    }

    #[test]
    fn peak_matches_analytic_sir_peak() {
        // Peak occurs when S = N/R0: I_peak = S0 + I0 - N/R0 + (N/R0) ln((N/R0)/S0).
        let (model, initial) = textbook_model();
        let n = model.population;
        let s_peak = n / model.r0();
        let analytic =
            initial.susceptible + initial.infected - s_peak + s_peak * (s_peak / initial.susceptible).ln();

        let times: Vec<f64> = (0..1600).map(|i| i as f64 * 0.1).collect();
        let traj = model.simulate(&initial, &times, &Rk45Options::default()).unwrap();
        let (_, peak) = traj.peak_infected().unwrap();

        let rel = (peak - analytic).abs() / analytic;
        assert!(rel < 1e-3, "numerical peak {peak} vs analytic {analytic}");
    }

    #[test]
    fn zero_rates_freeze_the_system() {
        let model = SirModel::new(1000.0, ParameterPoint::new(0.0, 0.0));
        let initial = CompartmentState::new(999.0, 1.0, 0.0);
        let times = day_grid(10);
        let traj = model.simulate(&initial, &times, &Rk45Options::default()).unwrap();

        for state in traj.states() {
            assert!((state.susceptible - 999.0).abs() < 1e-9);
            assert!((state.infected - 1.0).abs() < 1e-9);
            assert!(state.recovered.abs() < 1e-9);
        }
    }
}
