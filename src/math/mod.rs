//! Mathematical utilities: the adaptive ODE integrator.

pub mod rk45;

pub use rk45::*;
