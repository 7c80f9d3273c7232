//! CSV ingest and normalization.
//!
//! This module turns a two-column time-series CSV into a clean `Dataset` that
//! is safe to fit.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no estimation logic here
//!
//! Expected schema: a header row naming a time column (`t`, `time`, or `day`)
//! and an infected-count column (`i`, `infected`, or `cases`), followed by
//! numeric rows with strictly increasing times.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, DatasetStats};
use crate::error::AppError;

const TIME_ALIASES: [&str; 3] = ["t", "time", "day"];
const INFECTED_ALIASES: [&str; 3] = ["i", "infected", "cases"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized dataset + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and normalize a dataset CSV from disk.
pub fn load_dataset(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::invalid_input(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_dataset(file)
}

/// Load and normalize a dataset CSV from any reader (testable without files).
pub fn read_dataset<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let time_col = find_column(&headers, &TIME_ALIASES).ok_or_else(|| {
        AppError::invalid_input("CSV is missing a time column (expected `t`, `time`, or `day`).")
    })?;
    let infected_col = find_column(&headers, &INFECTED_ALIASES).ok_or_else(|| {
        AppError::invalid_input(
            "CSV is missing an infected column (expected `i`, `infected`, or `cases`).",
        )
    })?;

    let mut times = Vec::new();
    let mut infected = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (i, record) in reader.records().enumerate() {
        // Header is line 1; data starts at line 2.
        let line = i + 2;
        rows_read += 1;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("Unreadable row: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, time_col, infected_col) {
            Ok((t, i_obs)) => {
                if let Some(&prev) = times.last() {
                    if t <= prev {
                        row_errors.push(RowError {
                            line,
                            message: format!("Time {t} is not after previous time {prev}."),
                        });
                        continue;
                    }
                }
                times.push(t);
                infected.push(i_obs);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = times.len();
    let dataset = Dataset { times, infected };
    let stats = dataset
        .stats()
        .ok_or_else(|| AppError::invalid_input("CSV contained no usable data rows."))?;

    Ok(IngestedData {
        dataset,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|a| h.eq_ignore_ascii_case(a)))
}

fn parse_row(
    record: &StringRecord,
    time_col: usize,
    infected_col: usize,
) -> Result<(f64, f64), String> {
    let field = |col: usize, name: &str| -> Result<f64, String> {
        let raw = record
            .get(col)
            .ok_or_else(|| format!("Missing {name} field."))?;
        let value: f64 = raw
            .parse()
            .map_err(|_| format!("Invalid {name} value '{raw}'."))?;
        if !value.is_finite() {
            return Err(format!("Non-finite {name} value '{raw}'."));
        }
        Ok(value)
    };

    let t = field(time_col, "time")?;
    let i_obs = field(infected_col, "infected")?;
    if i_obs < 0.0 {
        return Err(format!("Negative infected count {i_obs}."));
    }
    Ok((t, i_obs))
}
