//! Shared "fit pipeline" logic used by the CLI and by tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dataset load/generate -> validate -> grid search -> result
//!
//! The CLI can then focus on presentation (printing summaries and tables).

use std::path::PathBuf;

use crate::data::{SampleSpec, generate_sample};
use crate::domain::{Dataset, DatasetStats, EstimateConfig, EstimationResult};
use crate::error::AppError;
use crate::fit::estimate;
use crate::io::ingest::{RowError, load_dataset};

/// Where the observed dataset comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Two-column CSV on disk.
    Csv(PathBuf),
    /// Seeded synthetic outbreak with a planted answer.
    Synthetic(SampleSpec),
}

/// A full run's configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: DataSource,
    pub estimate: EstimateConfig,
}

/// All computed outputs of a single `sirfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub result: EstimationResult,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    let (dataset, row_errors) = match &config.source {
        DataSource::Csv(path) => {
            let ingested = load_dataset(path)?;
            (ingested.dataset, ingested.row_errors)
        }
        DataSource::Synthetic(spec) => (generate_sample(spec)?, Vec::new()),
    };

    let stats = dataset
        .stats()
        .ok_or_else(|| AppError::invalid_input("Dataset is empty."))?;

    let result = estimate(&dataset, &config.estimate)?;

    Ok(RunOutput {
        dataset,
        stats,
        row_errors,
        result,
    })
}
