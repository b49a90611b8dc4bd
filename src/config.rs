use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::errors::AuditError;
use crate::types::{ChangeType, RetailerLabel};

/// Policy A configuration: priority coverage plus layered per-user floors.
#[derive(Clone, Debug)]
pub struct CoverageConfig {
    /// Percentage of each priority stratum drawn in the first pass (0-100).
    pub priority_percentage: u32,
    /// Per-user percentage floor applied in the second pass (0-100).
    pub user_percentage: u32,
    /// Absolute per-user floor applied in the final pass.
    pub min_samples: usize,
    /// RNG seed driving the priority and percentage passes.
    pub seed: u64,
    /// Seed for the absolute-floor pass. `Some(seed)` reproduces the
    /// fixed-seed top-up variant and is the default; `None` continues the
    /// main seeded stream instead of restarting it.
    pub floor_seed: Option<u64>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            priority_percentage: defaults::PRIORITY_PERCENTAGE,
            user_percentage: defaults::USER_PERCENTAGE,
            min_samples: defaults::MIN_SAMPLES,
            seed: defaults::SEED,
            floor_seed: Some(defaults::SEED),
        }
    }
}

impl CoverageConfig {
    /// Validate numeric ranges. Runs before any data is touched.
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.priority_percentage > 100 {
            return Err(AuditError::Configuration(format!(
                "priority percentage {} is out of range (0-100)",
                self.priority_percentage
            )));
        }
        if self.user_percentage > 100 {
            return Err(AuditError::Configuration(format!(
                "user percentage {} is out of range (0-100)",
                self.user_percentage
            )));
        }
        Ok(())
    }
}

/// One (change-type, retailer) stratum cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuotaCell {
    /// Change-type label the cell matches on.
    pub change_type: ChangeType,
    /// Retailer label the cell matches on.
    pub retailer: RetailerLabel,
}

/// One quota line as it appears in a quota reference file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuotaEntry {
    /// Change-type label.
    pub change_type: ChangeType,
    /// Retailer label.
    pub retailer: RetailerLabel,
    /// Required sample count for the cell.
    pub count: usize,
}

/// Policy B configuration: fixed quota per disjoint stratum cell.
///
/// Cells keep their insertion order for reporting, but each cell draws from
/// its own derived seed so reordering the table does not perturb draws.
#[derive(Clone, Debug)]
pub struct QuotaConfig {
    /// Quota per cell, in report order.
    pub quotas: IndexMap<QuotaCell, usize>,
    /// Base RNG seed; per-cell seeds are derived from it.
    pub seed: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            quotas: IndexMap::new(),
            seed: defaults::SEED,
        }
    }
}

impl QuotaConfig {
    /// Build a config from quota lines, keeping their order.
    pub fn from_entries(entries: Vec<QuotaEntry>, seed: u64) -> Self {
        let mut quotas = IndexMap::with_capacity(entries.len());
        for entry in entries {
            quotas.insert(
                QuotaCell {
                    change_type: entry.change_type,
                    retailer: entry.retailer,
                },
                entry.count,
            );
        }
        Self { quotas, seed }
    }

    /// Load quota lines from a JSON reader.
    pub fn from_json_reader<R: Read>(reader: R, seed: u64) -> Result<Self, AuditError> {
        let entries: Vec<QuotaEntry> = serde_json::from_reader(reader)
            .map_err(|err| AuditError::Configuration(format!("quota table: {err}")))?;
        Ok(Self::from_entries(entries, seed))
    }

    /// Load quota lines from a JSON file on disk.
    pub fn from_json_path(path: &Path, seed: u64) -> Result<Self, AuditError> {
        Self::from_json_reader(BufReader::new(File::open(path)?), seed)
    }

    /// Validate the quota table. Runs before any data is touched.
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.quotas.is_empty() {
            return Err(AuditError::Configuration(
                "quota table is empty".to_string(),
            ));
        }
        Ok(())
    }
}
