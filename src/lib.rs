#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Retailer classification and module derivation.
pub mod classify;
/// Sampler configuration types.
pub mod config;
/// Centralized constants used across filtering, sampling, and summaries.
pub mod constants;
/// Named-table CSV export sink.
pub mod export;
/// Predicate-based row filtering.
pub mod filter;
/// End-to-end coverage and quota pipelines.
pub mod pipeline;
/// Coding-progress consolidation report.
pub mod progress;
/// Injected deterministic random source.
pub mod rng;
/// Externally loaded reference rosters.
pub mod rosters;
/// Stratified sampler implementations (coverage and quota policies).
pub mod sample;
/// Grouped coverage summaries and grand-totals rows.
pub mod summary;
/// In-memory row store and cell values.
pub mod table;
/// Shared type aliases.
pub mod types;

mod errors;

pub use classify::{module_of, Classifier, Rule};
pub use config::{CoverageConfig, QuotaCell, QuotaConfig, QuotaEntry};
pub use errors::AuditError;
pub use export::{to_csv_bytes, write_dir, NamedTable};
pub use filter::Predicate;
pub use pipeline::{coverage_run, quota_run, ColumnMap, CoverageRun, QuotaRun};
pub use progress::{progress_report, ProgressColumns, ProgressInput, ProgressReport};
pub use rng::DeterministicRng;
pub use rosters::{ProfileSet, Rosters};
pub use sample::{
    coverage_sample, quota_sample, CoverageOutcome, CoveragePlan, CoverageSample, QuotaPlan,
    QuotaReportRow, QuotaSample,
};
pub use summary::{append_grand_totals, group_summary, quota_report_table};
pub use table::{Row, Table, Value};
pub use types::{
    ChangeType, ColumnName, ExternalCode, ModuleName, OperatorId, RetailerLabel,
};
