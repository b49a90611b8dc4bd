//! End-to-end runs composing the filter, classifier, sampler, and
//! aggregator stages the way the audit pages do.

use tracing::info;

use crate::classify::{module_of, Classifier};
use crate::config::{CoverageConfig, QuotaConfig};
use crate::constants::{columns, exclusions, summary as labels};
use crate::errors::AuditError;
use crate::filter::{self, Predicate};
use crate::rosters::{ProfileSet, Rosters};
use crate::sample::{
    coverage_sample, quota_sample, CoverageOutcome, CoveragePlan, QuotaPlan, QuotaReportRow,
};
use crate::summary::{append_grand_totals, group_summary, quota_report_table};
use crate::table::{Table, Value};
use crate::types::ColumnName;

/// Column bindings for coding-tool exports; defaults match the production
/// export headers.
#[derive(Clone, Debug)]
pub struct ColumnMap {
    /// Operator identifier column.
    pub user_profile: ColumnName,
    /// Change-type label column.
    pub changed_using: ColumnName,
    /// Unique external code column.
    pub external_code: ColumnName,
    /// Item description column (module derivation source).
    pub item_description: ColumnName,
    /// Destination specificity column.
    pub item_specificity: ColumnName,
    /// Processing-group column (retailer classification source).
    pub processing_group: ColumnName,
    /// Supplier code column.
    pub supplier_code: ColumnName,
    /// Derived module column name.
    pub module: ColumnName,
    /// Derived retailer column name.
    pub retailer: ColumnName,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            user_profile: columns::USER_PROFILE.to_string(),
            changed_using: columns::CHANGED_USING.to_string(),
            external_code: columns::EXTERNAL_CODE.to_string(),
            item_description: columns::ITEM_DESCRIPTION.to_string(),
            item_specificity: columns::ITEM_SPECIFICITY.to_string(),
            processing_group: columns::PROCESSING_GROUP.to_string(),
            supplier_code: columns::SUPPLIER_CODE.to_string(),
            module: columns::MODULE.to_string(),
            retailer: columns::RETAILER.to_string(),
        }
    }
}

/// The standard exclusion predicates applied before coverage sampling:
/// drop system-operator rows and tool-driven changes, keep consolidated
/// items with a present description.
pub fn standard_exclusions(map: &ColumnMap) -> Vec<Predicate> {
    let mut predicates = vec![Predicate::NotContains {
        column: map.user_profile.clone(),
        needle: exclusions::SYSTEM_OPERATOR.to_string(),
        case_insensitive: false,
    }];
    for tool in exclusions::EXCLUDED_TOOLS {
        predicates.push(Predicate::NotContains {
            column: map.changed_using.clone(),
            needle: tool.to_string(),
            case_insensitive: true,
        });
    }
    predicates.push(Predicate::Equals {
        column: map.item_specificity.clone(),
        value: exclusions::CONSOLIDATED_ITEM.to_string(),
    });
    predicates.push(Predicate::NotNull {
        column: map.item_description.clone(),
    });
    predicates
}

/// Everything a coverage (BAU) run produces.
#[derive(Clone, Debug)]
pub struct CoverageRun {
    /// The final sample.
    pub sampled: Table,
    /// Per-module coverage summary with a grand-totals row.
    pub module_summary: Table,
    /// Per-operator coverage summary with a grand-totals row.
    pub user_summary: Table,
    /// Per-pass accounting.
    pub outcome: CoverageOutcome,
}

/// Run the coverage pipeline: standard exclusions, module derivation,
/// roster allow-filter, Policy A sampling, then module and user summaries.
pub fn coverage_run(
    table: &Table,
    map: &ColumnMap,
    config: &CoverageConfig,
    rosters: &Rosters,
    profile_set: ProfileSet,
) -> Result<CoverageRun, AuditError> {
    config.validate()?;
    let operators = rosters.operators(profile_set)?;

    let filtered = filter::apply(table, &standard_exclusions(map))?;
    let filtered = filtered.derive_column(&map.item_description, &map.module, |value| {
        if value.is_null() {
            Value::Null
        } else {
            Value::Text(module_of(value))
        }
    })?;
    let filtered = filter::apply(
        &filtered,
        &[Predicate::In {
            column: map.user_profile.clone(),
            allowed: operators,
        }],
    )?;
    info!(rows = filtered.len(), "filtered input for coverage run");

    let plan = CoveragePlan {
        module_column: map.module.clone(),
        user_column: map.user_profile.clone(),
        code_column: map.external_code.clone(),
        priority_modules: rosters.priority_modules.clone(),
    };
    let sample = coverage_sample(&filtered, config, &plan)?;
    info!(
        priority = sample.outcome.priority_pass,
        percentage = sample.outcome.percentage_pass,
        floor = sample.outcome.floor_pass,
        total = sample.outcome.total(),
        "coverage sampling complete"
    );

    let mut module_summary = group_summary(&filtered, &sample.rows, &map.module)?;
    append_grand_totals(&mut module_summary, &[(&map.module, labels::GRAND_TOTALS)]);
    let mut user_summary = group_summary(&filtered, &sample.rows, &map.user_profile)?;
    append_grand_totals(
        &mut user_summary,
        &[(&map.user_profile, labels::GRAND_TOTALS)],
    );

    Ok(CoverageRun {
        sampled: sample.rows,
        module_summary,
        user_summary,
        outcome: sample.outcome,
    })
}

/// Everything a quota (ML) run produces.
#[derive(Clone, Debug)]
pub struct QuotaRun {
    /// The final sample.
    pub sampled: Table,
    /// Expected-vs-actual report table with its totals row.
    pub summary: Table,
    /// The raw report rows behind `summary`.
    pub report: Vec<QuotaReportRow>,
}

/// Run the quota pipeline: retailer classification, external-code dedup,
/// blank-supplier filter, then Policy B sampling and its report.
pub fn quota_run(
    table: &Table,
    map: &ColumnMap,
    config: &QuotaConfig,
) -> Result<QuotaRun, AuditError> {
    config.validate()?;
    let classifier = Classifier::retailer();
    let classified = table.derive_column(&map.processing_group, &map.retailer, |value| {
        Value::Text(classifier.classify(value).to_string())
    })?;
    let deduped = classified.dedup_by(&map.external_code)?;
    let unsupplied = filter::apply(
        &deduped,
        &[Predicate::IsNull {
            column: map.supplier_code.clone(),
        }],
    )?;
    info!(rows = unsupplied.len(), "filtered input for quota run");

    let plan = QuotaPlan {
        change_type_column: map.changed_using.clone(),
        retailer_column: map.retailer.clone(),
        code_column: map.external_code.clone(),
    };
    let sample = quota_sample(&unsupplied, config, &plan)?;
    info!(sampled = sample.rows.len(), "quota sampling complete");

    let summary = quota_report_table(&sample.report, &map.changed_using, &map.retailer);
    Ok(QuotaRun {
        sampled: sample.rows,
        summary,
        report: sample.report,
    })
}
