//! Grouped coverage summaries and grand-totals rows.

use indexmap::IndexMap;

use crate::constants::summary as labels;
use crate::errors::AuditError;
use crate::sample::QuotaReportRow;
use crate::table::{Row, Table, Value};

/// Per-group sampled count, total count, and coverage percentage.
///
/// Totals come from the full filtered dataset, not just the sample, and
/// groups present in the full data but absent from the sample report a
/// sampled count of 0 rather than being omitted. Groups appear in
/// first-appearance order of the full dataset.
pub fn group_summary(full: &Table, sampled: &Table, key_column: &str) -> Result<Table, AuditError> {
    let full_idx = full.column_index(key_column)?;
    let sampled_idx = sampled.column_index(key_column)?;

    // key -> (sampled count, total count)
    let mut counts: IndexMap<String, (usize, usize)> = IndexMap::new();
    for row in 0..full.len() {
        let value = full.value(row, full_idx);
        if value.is_null() {
            continue;
        }
        counts.entry(value.render()).or_default().1 += 1;
    }
    for row in 0..sampled.len() {
        let value = sampled.value(row, sampled_idx);
        if value.is_null() {
            continue;
        }
        counts.entry(value.render()).or_default().0 += 1;
    }

    let mut out = Table::new(vec![
        key_column.to_string(),
        labels::SAMPLE_COUNT.to_string(),
        labels::TOTAL_VOLUME.to_string(),
        labels::PERCENTAGE.to_string(),
    ]);
    for (key, (sampled_count, total)) in counts {
        let percentage = if total == 0 {
            0.0
        } else {
            sampled_count as f64 / total as f64 * 100.0
        };
        out.push_row(Row(vec![
            Value::Text(key),
            Value::Number(sampled_count as f64),
            Value::Number(total as f64),
            Value::Number(percentage),
        ]));
    }
    Ok(out)
}

/// Append a grand-totals row summing every numeric column.
///
/// `label_overrides` maps column names to the label text placed in that
/// column of the totals row (for example the key column to `Grand Totals`).
/// Columns that are neither labeled nor numeric stay null.
pub fn append_grand_totals(table: &mut Table, label_overrides: &[(&str, &str)]) {
    let column_count = table.columns().len();
    let mut sums: Vec<Option<f64>> = vec![None; column_count];
    for row in table.rows() {
        for (idx, value) in row.0.iter().enumerate() {
            if let Value::Number(number) = value {
                *sums[idx].get_or_insert(0.0) += number;
            }
        }
    }

    let mut totals = Vec::with_capacity(column_count);
    for (idx, column) in table.columns().iter().enumerate() {
        let label = label_overrides
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, label)| *label);
        let cell = match (label, sums[idx]) {
            (Some(label), _) => Value::Text(label.to_string()),
            (None, Some(sum)) => Value::Number(sum),
            (None, None) => Value::Null,
        };
        totals.push(cell);
    }
    table.push_row(Row(totals));
}

/// Render the quota report as a table with its totals row.
pub fn quota_report_table(
    report: &[QuotaReportRow],
    change_type_column: &str,
    retailer_column: &str,
) -> Table {
    let mut out = Table::new(vec![
        change_type_column.to_string(),
        retailer_column.to_string(),
        labels::EXPECTED.to_string(),
        labels::ACTUAL.to_string(),
    ]);
    for row in report {
        out.push_row(Row(vec![
            Value::Text(row.change_type.clone()),
            Value::Text(row.retailer.clone()),
            Value::Number(row.expected as f64),
            Value::Number(row.actual as f64),
        ]));
    }
    append_grand_totals(
        &mut out,
        &[
            (change_type_column, labels::TOTAL),
            (retailer_column, labels::ALL),
        ],
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn table_of(column: &str, keys: &[&str]) -> Table {
        let mut table = Table::new(vec![column.to_string()]);
        for key in keys {
            table.push_row(Row(vec![text(key)]));
        }
        table
    }

    #[test]
    fn groups_missing_from_sample_report_zero() {
        let full = table_of("Module", &["BEER", "BEER", "TEA", "SIDES"]);
        let sampled = table_of("Module", &["BEER"]);
        let summary = group_summary(&full, &sampled, "Module").expect("summary");
        assert_eq!(summary.len(), 3);
        assert_eq!(summary.value(1, 0), &text("TEA"));
        assert_eq!(summary.value(1, 1), &Value::Number(0.0));
        assert_eq!(summary.value(1, 2), &Value::Number(1.0));
        assert_eq!(summary.value(1, 3), &Value::Number(0.0));
    }

    #[test]
    fn coverage_percentage_is_sampled_over_total() {
        let full = table_of("Module", &["BEER", "BEER", "BEER", "BEER"]);
        let sampled = table_of("Module", &["BEER"]);
        let summary = group_summary(&full, &sampled, "Module").expect("summary");
        assert_eq!(summary.value(0, 3), &Value::Number(25.0));
    }

    #[test]
    fn grand_totals_sum_numeric_columns() {
        let full = table_of("Module", &["BEER", "BEER", "TEA"]);
        let sampled = table_of("Module", &["BEER", "TEA"]);
        let mut summary = group_summary(&full, &sampled, "Module").expect("summary");
        append_grand_totals(&mut summary, &[("Module", "Grand Totals")]);
        let totals_row = summary.len() - 1;
        assert_eq!(summary.value(totals_row, 0), &text("Grand Totals"));
        assert_eq!(summary.value(totals_row, 1), &Value::Number(2.0));
        assert_eq!(summary.value(totals_row, 2), &Value::Number(3.0));
    }

    #[test]
    fn quota_report_totals_sum_expected_and_actual() {
        let report = vec![
            QuotaReportRow {
                change_type: "UPC MATCHING".into(),
                retailer: "Amazon".into(),
                expected: 800,
                actual: 500,
            },
            QuotaReportRow {
                change_type: "UPC MATCHING".into(),
                retailer: "B&M".into(),
                expected: 150,
                actual: 150,
            },
        ];
        let table = quota_report_table(&report, "Changed Using", "Retailer");
        assert_eq!(table.len(), 3);
        let totals = table.len() - 1;
        assert_eq!(table.value(totals, 0), &text("Total"));
        assert_eq!(table.value(totals, 1), &text("All"));
        assert_eq!(table.value(totals, 2), &Value::Number(950.0));
        assert_eq!(table.value(totals, 3), &Value::Number(650.0));
    }
}
