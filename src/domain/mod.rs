//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`CostKind`, `FailurePolicy`)
//! - model state and trajectories (`CompartmentState`, `Trajectory`)
//! - observed datasets (`Dataset`, `DatasetStats`)
//! - estimation inputs/outputs (`EstimateConfig`, `EstimationResult`)

pub mod types;

pub use types::*;
