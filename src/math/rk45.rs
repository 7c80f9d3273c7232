//! Adaptive Runge-Kutta integrator for small ODE systems.
//!
//! In this project we repeatedly integrate the same 3-state nonlinear system
//! (the SIR model) over a fixed time grid, once per grid-search cell, so the
//! integrator needs to be:
//!
//! - accurate enough that cost differences between cells reflect the model,
//!   not step-size noise
//! - deterministic given the same inputs (no randomness, no threading inside)
//! - sampled exactly at the caller's requested times
//!
//! Implementation choices:
//! - Embedded Dormand-Prince 5(4) with standard proportional step control.
//! - The internal step is free to vary, but it is clamped so integration never
//!   oversteps the next requested output time; each requested time is hit
//!   exactly rather than interpolated.
//! - Failures (step underflow, step budget exhausted, non-finite state) return
//!   `None` and the caller decides policy, mirroring how the rest of the crate
//!   wraps numeric failures into `AppError`.

use nalgebra::Vector3;

/// Tolerances and limits for one integration run.
#[derive(Debug, Clone, Copy)]
pub struct Rk45Options {
    /// Relative tolerance per component.
    pub rel_tol: f64,
    /// Absolute tolerance per component.
    pub abs_tol: f64,
    /// Maximum accepted-or-rejected steps across the whole run.
    pub max_steps: usize,
}

impl Default for Rk45Options {
    fn default() -> Self {
        Self {
            rel_tol: 1e-8,
            abs_tol: 1e-8,
            max_steps: 100_000,
        }
    }
}

// Dormand-Prince 5(4) tableau.
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order solution weights.
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Error weights (5th-order minus embedded 4th-order).
const E1: f64 = B1 - 5179.0 / 57600.0;
const E3: f64 = B3 - 7571.0 / 16695.0;
const E4: f64 = B4 - 393.0 / 640.0;
const E5: f64 = B5 + 92097.0 / 339200.0;
const E6: f64 = B6 - 187.0 / 2100.0;
const E7: f64 = -1.0 / 40.0;

/// Step-size growth/shrink clamps (standard controller bounds).
const GROW_MAX: f64 = 5.0;
const SHRINK_MIN: f64 = 0.2;
const SAFETY: f64 = 0.9;

/// Integrate `dy/dt = f(t, y)` and sample at each entry of `times`.
///
/// `times` must be strictly increasing; `times[0]` is the initial time and the
/// first output sample is `y0` itself. Returns one state per requested time,
/// or `None` if the integrator fails to converge.
pub fn integrate<F>(f: F, times: &[f64], y0: Vector3<f64>, opts: &Rk45Options) -> Option<Vec<Vector3<f64>>>
where
    F: Fn(f64, &Vector3<f64>) -> Vector3<f64>,
{
    let Some((&t0, rest)) = times.split_first() else {
        return Some(Vec::new());
    };
    if !y0.iter().all(|v| v.is_finite()) {
        return None;
    }

    let mut out = Vec::with_capacity(times.len());
    out.push(y0);

    let mut t = t0;
    let mut y = y0;
    let span = times[times.len() - 1] - t0;
    if span <= 0.0 && !rest.is_empty() {
        return None;
    }

    // Initial guess; the controller adapts from here within a step or two.
    let mut h = (span / 100.0).max(f64::MIN_POSITIVE);
    let mut steps = 0usize;

    for &t_target in rest {
        if !(t_target.is_finite() && t_target > t) {
            return None;
        }

        while t < t_target {
            // Float accumulation can leave a gap of a few ulps; treat that as
            // already at the target instead of asking for an impossible step.
            let gap = t_target - t;
            if gap <= 4.0 * f64::EPSILON * t_target.abs().max(1.0) {
                t = t_target;
                break;
            }

            steps += 1;
            if steps > opts.max_steps {
                return None;
            }

            let h_try = h.min(gap);
            if h_try <= f64::EPSILON * t.abs().max(1.0) {
                // Step underflow: the controller cannot make progress.
                return None;
            }

            let (y_next, err) = dp_step(&f, t, &y, h_try, opts);

            if err.is_finite() && err <= 1.0 {
                t += h_try;
                y = y_next;
            }

            // Proportional controller. A non-finite error estimate counts as
            // a hard rejection; truly divergent systems then run the step
            // size into the underflow guard above.
            let factor = if !err.is_finite() {
                SHRINK_MIN
            } else if err == 0.0 {
                GROW_MAX
            } else {
                (SAFETY * err.powf(-0.2)).clamp(SHRINK_MIN, GROW_MAX)
            };
            h = h_try * factor;
        }

        out.push(y);
    }

    Some(out)
}

/// One Dormand-Prince step; returns the 5th-order update and the scaled error norm.
fn dp_step<F>(f: &F, t: f64, y: &Vector3<f64>, h: f64, opts: &Rk45Options) -> (Vector3<f64>, f64)
where
    F: Fn(f64, &Vector3<f64>) -> Vector3<f64>,
{
    let k1 = f(t, y);
    let k2 = f(t + h / 5.0, &(y + h * A21 * k1));
    let k3 = f(t + 3.0 * h / 10.0, &(y + h * (A31 * k1 + A32 * k2)));
    let k4 = f(t + 4.0 * h / 5.0, &(y + h * (A41 * k1 + A42 * k2 + A43 * k3)));
    let k5 = f(
        t + 8.0 * h / 9.0,
        &(y + h * (A51 * k1 + A52 * k2 + A53 * k3 + A54 * k4)),
    );
    let k6 = f(
        t + h,
        &(y + h * (A61 * k1 + A62 * k2 + A63 * k3 + A64 * k4 + A65 * k5)),
    );

    let y_next = y + h * (B1 * k1 + B3 * k3 + B4 * k4 + B5 * k5 + B6 * k6);
    let k7 = f(t + h, &y_next);

    let err_vec = h * (E1 * k1 + E3 * k3 + E4 * k4 + E5 * k5 + E6 * k6 + E7 * k7);

    // RMS of the componentwise error scaled by mixed abs/rel tolerance.
    let mut sum = 0.0;
    for i in 0..3 {
        let scale = opts.abs_tol + opts.rel_tol * y[i].abs().max(y_next[i].abs());
        let e = err_vec[i] / scale;
        sum += e * e;
    }
    let err = (sum / 3.0).sqrt();

    if y_next.iter().all(|v| v.is_finite()) {
        (y_next, err)
    } else {
        (y_next, f64::INFINITY)
    }
}
