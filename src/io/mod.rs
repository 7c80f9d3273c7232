//! Input helpers.
//!
//! - CSV dataset ingest + validation (`ingest`)

pub mod ingest;

pub use ingest::*;
