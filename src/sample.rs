//! Stratified sampler implementations (coverage and quota policies).
//!
//! Both policies share the same discipline: draws are without replacement,
//! the final sample is unique by external code (tracked as an explicit
//! key set, never by row position), and undersupply takes what is available
//! instead of failing. The only error either policy can raise is a missing
//! required column.

use std::collections::HashSet;

use indexmap::IndexMap;
use rand::seq::index;
use tracing::{debug, warn};

use crate::config::{CoverageConfig, QuotaConfig};
use crate::errors::AuditError;
use crate::rng::{stable_hash_str, DeterministicRng};
use crate::table::{Table, Value};
use crate::types::{ChangeType, ColumnName, ExternalCode, ModuleName, RetailerLabel};

/// Column bindings and reference sets for a coverage (Policy A) run.
#[derive(Clone, Debug)]
pub struct CoveragePlan {
    /// Column holding the derived category/module key.
    pub module_column: ColumnName,
    /// Column holding the operator identifier.
    pub user_column: ColumnName,
    /// Column holding the unique external code.
    pub code_column: ColumnName,
    /// Modules that receive guaranteed first-pass coverage, in roster order.
    pub priority_modules: Vec<ModuleName>,
}

/// Column bindings for a quota (Policy B) run.
#[derive(Clone, Debug)]
pub struct QuotaPlan {
    /// Column holding the change-type label.
    pub change_type_column: ColumnName,
    /// Column holding the retailer label.
    pub retailer_column: ColumnName,
    /// Column holding the unique external code.
    pub code_column: ColumnName,
}

/// Per-pass accounting for a coverage run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageOutcome {
    /// Rows added by the priority-stratum pass.
    pub priority_pass: usize,
    /// Rows added by the per-user percentage pass.
    pub percentage_pass: usize,
    /// Rows added by the per-user absolute-floor pass.
    pub floor_pass: usize,
}

impl CoverageOutcome {
    /// Total rows in the final sample.
    pub fn total(&self) -> usize {
        self.priority_pass + self.percentage_pass + self.floor_pass
    }
}

/// Sampled rows plus the per-pass accounting that goes with them.
#[derive(Clone, Debug)]
pub struct CoverageSample {
    /// The final sample, unique by external code, in input-row order.
    pub rows: Table,
    /// How many rows each pass contributed.
    pub outcome: CoverageOutcome,
}

/// One expected-vs-actual line of the quota report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotaReportRow {
    /// Change-type label of the cell.
    pub change_type: ChangeType,
    /// Retailer label of the cell.
    pub retailer: RetailerLabel,
    /// Configured quota for the cell.
    pub expected: usize,
    /// Rows actually drawn (capped by supply and dedup).
    pub actual: usize,
}

/// Sampled rows plus the per-cell quota report.
#[derive(Clone, Debug)]
pub struct QuotaSample {
    /// The final sample, unique by external code, in input-row order.
    pub rows: Table,
    /// Expected-vs-actual line per quota cell, in quota-table order.
    pub report: Vec<QuotaReportRow>,
}

/// Accumulates selected row indices, deduplicated by external code.
///
/// Membership is keyed by the code value itself, not by row position, so
/// reordered or concatenated inputs cannot alias distinct rows.
struct SampleSet<'a> {
    table: &'a Table,
    code_idx: usize,
    selected: Vec<usize>,
    seen_rows: HashSet<usize>,
    seen_codes: HashSet<ExternalCode>,
}

impl<'a> SampleSet<'a> {
    fn new(table: &'a Table, code_idx: usize) -> Self {
        Self {
            table,
            code_idx,
            selected: Vec::new(),
            seen_rows: HashSet::new(),
            seen_codes: HashSet::new(),
        }
    }

    /// Insert a row unless it (or its external code) is already sampled.
    fn insert(&mut self, row: usize) -> bool {
        if self.seen_rows.contains(&row) {
            return false;
        }
        match self.table.value(row, self.code_idx) {
            Value::Null => {}
            value => {
                if !self.seen_codes.insert(value.render()) {
                    return false;
                }
            }
        }
        self.seen_rows.insert(row);
        self.selected.push(row);
        true
    }

    fn contains_row(&self, row: usize) -> bool {
        self.seen_rows.contains(&row)
    }

    fn into_table(mut self) -> Table {
        self.selected.sort_unstable();
        self.table.select(&self.selected)
    }
}

/// `ceil(count x percentage / 100)` as used by both floor computations.
fn ceil_pct(count: usize, percentage: u32) -> usize {
    (count * percentage as usize).div_ceil(100)
}

/// Draw up to `amount` distinct entries of `pool` without replacement.
fn draw(pool: &[usize], amount: usize, rng: &mut DeterministicRng) -> Vec<usize> {
    let amount = amount.min(pool.len());
    if amount == 0 {
        return Vec::new();
    }
    index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|idx| pool[idx])
        .collect()
}

/// Group row indices by the rendered value of one column, in first-appearance
/// order. Rows with a null key are skipped (they form no stratum).
fn group_rows(table: &Table, column_idx: usize) -> IndexMap<String, Vec<usize>> {
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for row in 0..table.len() {
        let value = table.value(row, column_idx);
        if value.is_null() {
            continue;
        }
        groups.entry(value.render()).or_default().push(row);
    }
    groups
}

/// Policy A: priority-stratum coverage, then a per-user percentage floor,
/// then a per-user absolute floor.
///
/// Each pass only adds rows. Empty strata and user groups are skipped
/// silently; when a pass asks for more rows than a group still has, it takes
/// everything available. Required counts apply to the pre-dedup draw; the
/// sample set reconciles duplicates by external-code key.
pub fn coverage_sample(
    table: &Table,
    config: &CoverageConfig,
    plan: &CoveragePlan,
) -> Result<CoverageSample, AuditError> {
    config.validate()?;
    let module_idx = table.column_index(&plan.module_column)?;
    let user_idx = table.column_index(&plan.user_column)?;
    let code_idx = table.column_index(&plan.code_column)?;

    let mut rng = DeterministicRng::new(config.seed);
    let mut set = SampleSet::new(table, code_idx);
    let mut outcome = CoverageOutcome::default();

    // Pass 1: guaranteed coverage for priority modules present in the data.
    let by_module = group_rows(table, module_idx);
    for module in &plan.priority_modules {
        let Some(rows) = by_module.get(module.as_str()) else {
            continue;
        };
        let required = ceil_pct(rows.len(), config.priority_percentage);
        for idx in draw(rows, required, &mut rng) {
            if set.insert(idx) {
                outcome.priority_pass += 1;
            }
        }
    }
    debug!(added = outcome.priority_pass, "priority pass complete");

    // Pass 2: per-user percentage floor, drawing from still-unsampled rows.
    let by_user = group_rows(table, user_idx);
    for rows in by_user.values() {
        let min_required = ceil_pct(rows.len(), config.user_percentage);
        let current = rows.iter().filter(|&&idx| set.contains_row(idx)).count();
        if current >= min_required {
            continue;
        }
        let remaining: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&idx| !set.contains_row(idx))
            .collect();
        for idx in draw(&remaining, min_required - current, &mut rng) {
            if set.insert(idx) {
                outcome.percentage_pass += 1;
            }
        }
    }
    debug!(added = outcome.percentage_pass, "percentage pass complete");

    // Pass 3: per-user absolute floor, capped by availability. The floor
    // pass either restarts from its own fixed seed or continues the main
    // stream, per configuration.
    let mut floor_rng = match config.floor_seed {
        Some(seed) => DeterministicRng::new(seed),
        None => rng,
    };
    for rows in by_user.values() {
        let current = rows.iter().filter(|&&idx| set.contains_row(idx)).count();
        if current >= config.min_samples {
            continue;
        }
        let remaining: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&idx| !set.contains_row(idx))
            .collect();
        for idx in draw(&remaining, config.min_samples - current, &mut floor_rng) {
            if set.insert(idx) {
                outcome.floor_pass += 1;
            }
        }
    }
    debug!(added = outcome.floor_pass, "floor pass complete");

    Ok(CoverageSample {
        rows: set.into_table(),
        outcome,
    })
}

/// Policy B: fixed quota per (change-type, retailer) cell.
///
/// Each cell draws `min(quota, available)` rows without replacement from a
/// seed derived from the cell key. Cells are disjoint by construction, but
/// dedup by external code is still applied defensively; a duplicate logs a
/// warning and is dropped from `actual`.
pub fn quota_sample(
    table: &Table,
    config: &QuotaConfig,
    plan: &QuotaPlan,
) -> Result<QuotaSample, AuditError> {
    config.validate()?;
    let change_idx = table.column_index(&plan.change_type_column)?;
    let retailer_idx = table.column_index(&plan.retailer_column)?;
    let code_idx = table.column_index(&plan.code_column)?;

    let mut set = SampleSet::new(table, code_idx);
    let mut report = Vec::with_capacity(config.quotas.len());

    for (cell, &expected) in &config.quotas {
        let pool: Vec<usize> = (0..table.len())
            .filter(|&row| {
                table.value(row, change_idx).as_str() == Some(cell.change_type.as_str())
                    && table.value(row, retailer_idx).as_str() == Some(cell.retailer.as_str())
            })
            .collect();

        let cell_key = format!("{}|{}", cell.change_type, cell.retailer);
        let mut cell_rng = DeterministicRng::new(stable_hash_str(config.seed, &cell_key));
        let mut actual = 0;
        for idx in draw(&pool, expected, &mut cell_rng) {
            if set.insert(idx) {
                actual += 1;
            } else {
                warn!(
                    change_type = %cell.change_type,
                    retailer = %cell.retailer,
                    "duplicate external code across quota cells"
                );
            }
        }
        report.push(QuotaReportRow {
            change_type: cell.change_type.clone(),
            retailer: cell.retailer.clone(),
            expected,
            actual,
        });
    }

    Ok(QuotaSample {
        rows: set.into_table(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    #[test]
    fn ceil_pct_rounds_up() {
        assert_eq!(ceil_pct(7, 40), 3);
        assert_eq!(ceil_pct(10, 20), 2);
        assert_eq!(ceil_pct(5, 20), 1);
        assert_eq!(ceil_pct(2, 20), 1);
        assert_eq!(ceil_pct(0, 40), 0);
        assert_eq!(ceil_pct(9, 0), 0);
        assert_eq!(ceil_pct(9, 100), 9);
    }

    #[test]
    fn draw_caps_at_pool_size() {
        let pool = vec![10, 20, 30];
        let mut rng = DeterministicRng::new(1);
        let drawn = draw(&pool, 8, &mut rng);
        assert_eq!(drawn.len(), 3);
        let unique: HashSet<usize> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 3);
        assert!(draw(&pool, 0, &mut rng).is_empty());
        assert!(draw(&[], 4, &mut rng).is_empty());
    }

    #[test]
    fn sample_set_dedups_by_code_not_position() {
        let mut table = Table::new(vec!["Code".into()]);
        table.push_row(Row(vec![text("A1")]));
        table.push_row(Row(vec![text("A1")]));
        table.push_row(Row(vec![Value::Null]));
        table.push_row(Row(vec![Value::Null]));
        let mut set = SampleSet::new(&table, 0);
        assert!(set.insert(0));
        assert!(!set.insert(1));
        assert!(!set.insert(0));
        // Null codes carry no key; both rows are kept.
        assert!(set.insert(2));
        assert!(set.insert(3));
        assert_eq!(set.into_table().len(), 3);
    }

    #[test]
    fn group_rows_keeps_first_appearance_order_and_skips_nulls() {
        let mut table = Table::new(vec!["User".into()]);
        table.push_row(Row(vec![text("bob")]));
        table.push_row(Row(vec![Value::Null]));
        table.push_row(Row(vec![text("alice")]));
        table.push_row(Row(vec![text("bob")]));
        let groups = group_rows(&table, 0);
        let keys: Vec<&String> = groups.keys().collect();
        assert_eq!(keys, ["bob", "alice"]);
        assert_eq!(groups["bob"], vec![0, 3]);
    }
}
