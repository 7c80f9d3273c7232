//! Grid-search estimation.
//!
//! Responsibilities:
//!
//! - generate the (beta, gamma) parameter grid
//! - score each cell's simulated infected curve against observations (parallel)
//! - select the best cell deterministically (first-seen minimum)

pub mod cost;
pub mod estimator;
pub mod grid;

pub use cost::*;
pub use estimator::*;
pub use grid::*;
