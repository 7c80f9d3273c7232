//! The SIR compartmental model and its forward simulation.

pub mod sir;

pub use sir::*;
