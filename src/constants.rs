/// Column headers expected in coding-tool exports.
///
/// These are defaults for `ColumnMap`; callers with differently named exports
/// override them through configuration rather than renaming their files.
pub mod columns {
    /// Operator identifier column.
    pub const USER_PROFILE: &str = "User Profile";
    /// Change-type label column (which tool produced the coding change).
    pub const CHANGED_USING: &str = "Changed Using";
    /// Unique external item code column (natural key).
    pub const EXTERNAL_CODE: &str = "External Code";
    /// Item description column used for module derivation.
    pub const ITEM_DESCRIPTION: &str = "Current Nielsen Item Description";
    /// Destination specificity column used by the standard exclusions.
    pub const ITEM_SPECIFICITY: &str = "Current Destination Item Specificity";
    /// Processing-group description column used for retailer classification.
    pub const PROCESSING_GROUP: &str = "Processing Group Description";
    /// Supplier code column; quota runs keep only rows where it is blank.
    pub const SUPPLIER_CODE: &str = "Supplier Code - Current";
    /// Derived category/module column added before coverage sampling.
    pub const MODULE: &str = "Module";
    /// Derived retailer column added before quota sampling.
    pub const RETAILER: &str = "Retailer";
}

/// Labels used in generated summary tables.
pub mod summary {
    /// Per-group sampled-row count column.
    pub const SAMPLE_COUNT: &str = "Sample Count";
    /// Per-group full-dataset count column.
    pub const TOTAL_VOLUME: &str = "Total Volume";
    /// Coverage percentage column (sampled / total x 100).
    pub const PERCENTAGE: &str = "Percentage";
    /// Configured quota column in the quota report.
    pub const EXPECTED: &str = "Expected";
    /// Rows actually drawn column in the quota report.
    pub const ACTUAL: &str = "Actual";
    /// Key-column label for appended grand-totals rows.
    pub const GRAND_TOTALS: &str = "Grand Totals";
    /// Change-type label for the quota report totals row.
    pub const TOTAL: &str = "Total";
    /// Retailer label for the quota report totals row.
    pub const ALL: &str = "All";
}

/// Retailer classifier rule inputs and output labels.
pub mod retailer {
    /// Needle identifying NPD Amazon feeds (matched lower-cased).
    pub const AMAZON_NEEDLE: &str = "npd amazon (us)";
    /// Needle identifying remaining e-commerce processing groups.
    pub const ECOM_NEEDLE: &str = ".com";
    /// Label for Amazon feeds.
    pub const AMAZON: &str = "Amazon";
    /// Label for non-Amazon e-commerce feeds.
    pub const ECOM: &str = "Ecom";
    /// Fall-through label for brick-and-mortar feeds.
    pub const BRICK_AND_MORTAR: &str = "B&M";
}

/// Standard exclusion values applied before coverage sampling.
pub mod exclusions {
    /// System operator excluded from every coverage run.
    pub const SYSTEM_OPERATOR: &str = "OGRDS SYSTEM";
    /// Change tools excluded from coverage runs (matched case-insensitively).
    pub const EXCLUDED_TOOLS: [&str; 2] = ["ITEM CODING", "SURGERY"];
    /// Only rows at this destination specificity are audited.
    pub const CONSOLIDATED_ITEM: &str = "CONSOLIDATED ITEM";
    /// Separator between module and detail segments in item descriptions.
    pub const MODULE_SEPARATOR: char = '|';
}

/// Named roster keys recognized in roster reference files.
pub mod rosters {
    /// Profile-set key for the first operator roster.
    pub const SET_A: &str = "set_a";
    /// Profile-set key for the second operator roster.
    pub const SET_B: &str = "set_b";
}

/// Sampler defaults, overridable through configuration.
pub mod defaults {
    /// Default percentage of each priority stratum drawn in the first pass.
    pub const PRIORITY_PERCENTAGE: u32 = 40;
    /// Default per-operator percentage floor.
    pub const USER_PERCENTAGE: u32 = 20;
    /// Default per-operator absolute floor.
    pub const MIN_SAMPLES: usize = 50;
    /// Default RNG seed for every sampling pass.
    pub const SEED: u64 = 42;
}

/// Column headers and status labels used by the coding-progress report.
pub mod progress {
    /// Auditor name column.
    pub const NAME: &str = "Name";
    /// Work date column.
    pub const DATE: &str = "Date";
    /// Start-time column (Excel day fraction).
    pub const START_TIME: &str = "START TIME";
    /// End-time column (Excel day fraction).
    pub const END_TIME: &str = "END TIME";
    /// Auditor status column.
    pub const STATUS: &str = "Auditor's Status";
    /// Folder key column in folder-level summaries.
    pub const FOLDER: &str = "Folder";
    /// Completed-row count column.
    pub const COMPLETED_COUNT: &str = "Completed Count";
    /// Pending-row count column.
    pub const PENDING_COUNT: &str = "Pending Count";
    /// Completed + pending total column.
    pub const TOTAL: &str = "Total";
    /// Accumulated coding time column (HH:MM:SS).
    pub const TOTAL_CODING_TIME: &str = "Total Coding Time";
    /// Status value meaning the row still awaits audit.
    pub const PENDING: &str = "Pending";
    /// Status value meaning the row has been audited.
    pub const COMPLETED: &str = "Completed";
}
