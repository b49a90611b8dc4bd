use std::io;

use thiserror::Error;

use crate::types::ColumnName;

/// Error type for schema, configuration, roster, and boundary I/O failures.
///
/// Undersupply (a stratum or operator with fewer rows than requested) is
/// never an error: the sampler takes what is available and the deficit shows
/// up in the expected-vs-actual summary columns instead.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A required column is absent from the input; raised before sampling.
    #[error("required column '{column}' is missing from the input")]
    Schema {
        /// The column name that failed to resolve.
        column: ColumnName,
    },
    /// Invalid sampler parameters, caught before any data is processed.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Missing or malformed roster reference data.
    #[error("roster reference error: {0}")]
    Roster(String),
    /// CSV parse failure at the ingest boundary.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// File I/O failure at the ingest or export boundary.
    #[error(transparent)]
    Io(#[from] io::Error),
}
