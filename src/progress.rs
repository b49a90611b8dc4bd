//! Coding-progress consolidation across per-folder status workbooks.
//!
//! Each input table is one exported workbook of audited rows carrying an
//! auditor name, a work date, start/end times as Excel day fractions, and an
//! auditor status. The report rolls these up per folder, per auditor, and
//! per (folder, auditor), with grand-totals rows and coding time rendered as
//! `HH:MM:SS`.

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::constants::progress as labels;
use crate::constants::summary::GRAND_TOTALS;
use crate::errors::AuditError;
use crate::table::{Row, Table, Value};
use crate::types::ColumnName;

/// Column bindings for progress workbooks; defaults match the production
/// sheet headers.
#[derive(Clone, Debug)]
pub struct ProgressColumns {
    /// Auditor name column (required).
    pub name: ColumnName,
    /// Work date column (optional; missing dates coerce to today).
    pub date: ColumnName,
    /// Start-time column, Excel day fraction (optional).
    pub start_time: ColumnName,
    /// End-time column, Excel day fraction (optional).
    pub end_time: ColumnName,
    /// Auditor status column (required; blank means pending).
    pub status: ColumnName,
}

impl Default for ProgressColumns {
    fn default() -> Self {
        Self {
            name: labels::NAME.to_string(),
            date: labels::DATE.to_string(),
            start_time: labels::START_TIME.to_string(),
            end_time: labels::END_TIME.to_string(),
            status: labels::STATUS.to_string(),
        }
    }
}

/// One consolidated progress workbook with the folder it came from.
#[derive(Clone, Copy, Debug)]
pub struct ProgressInput<'a> {
    /// Folder the workbook was collected from.
    pub folder: &'a str,
    /// The workbook rows.
    pub table: &'a Table,
}

/// The three roll-up tables produced by one progress run.
#[derive(Clone, Debug)]
pub struct ProgressReport {
    /// Per-folder counts and coding time.
    pub folder_summary: Table,
    /// Per-auditor counts and coding time across all folders.
    pub auditor_summary: Table,
    /// Per (folder, auditor) counts and coding time.
    pub folder_auditor_summary: Table,
}

#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    completed: usize,
    pending: usize,
    seconds: f64,
}

impl Tally {
    fn absorb(&mut self, completed: bool, seconds: f64) {
        if completed {
            self.completed += 1;
        } else {
            self.pending += 1;
        }
        self.seconds += seconds;
    }
}

/// Format whole seconds as `HH:MM:SS`.
pub fn seconds_to_hms(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Coding seconds between two Excel day fractions; negatives clamp to zero
/// and missing endpoints contribute nothing.
fn coding_seconds(start: &Value, end: &Value) -> f64 {
    match (start.as_number(), end.as_number()) {
        (Some(start), Some(end)) => ((end - start) * 86_400.0).max(0.0),
        _ => 0.0,
    }
}

/// Parse a work date; blank or unparseable cells coerce to `today`.
fn normalize_date(value: &Value, today: NaiveDate) -> NaiveDate {
    let Some(text) = value.as_str() else {
        return today;
    };
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%m/%d/%Y"))
        .unwrap_or(today)
}

/// Blank status means pending; any other value counts as completed.
fn is_completed(status: &Value) -> bool {
    match status.as_str() {
        None => false,
        Some(text) => text != labels::PENDING,
    }
}

fn count_columns(key_columns: &[&str]) -> Vec<ColumnName> {
    let mut columns: Vec<ColumnName> = key_columns.iter().map(|name| name.to_string()).collect();
    columns.extend([
        labels::COMPLETED_COUNT.to_string(),
        labels::PENDING_COUNT.to_string(),
        labels::TOTAL.to_string(),
        labels::TOTAL_CODING_TIME.to_string(),
    ]);
    columns
}

fn tally_table(key_columns: &[&str], entries: Vec<(Vec<Value>, Tally)>) -> Table {
    let mut out = Table::new(count_columns(key_columns));
    let mut grand = Tally::default();
    for (keys, tally) in entries {
        grand.completed += tally.completed;
        grand.pending += tally.pending;
        grand.seconds += tally.seconds;
        let mut cells = keys;
        cells.extend([
            Value::Number(tally.completed as f64),
            Value::Number(tally.pending as f64),
            Value::Number((tally.completed + tally.pending) as f64),
            Value::Text(seconds_to_hms(tally.seconds)),
        ]);
        out.push_row(Row(cells));
    }

    let mut totals = vec![Value::Text(GRAND_TOTALS.to_string())];
    totals.extend((1..key_columns.len()).map(|_| Value::Null));
    totals.extend([
        Value::Number(grand.completed as f64),
        Value::Number(grand.pending as f64),
        Value::Number((grand.completed + grand.pending) as f64),
        Value::Text(seconds_to_hms(grand.seconds)),
    ]);
    out.push_row(Row(totals));
    out
}

/// Consolidate progress workbooks into folder, auditor, and combined
/// summaries for the requested date.
///
/// Rows whose date differs from `report_date` are skipped; rows without a
/// date (or with an unparseable one) are treated as worked `today`. Rows
/// with no auditor name count toward folder totals but not auditor ones.
pub fn progress_report(
    inputs: &[ProgressInput<'_>],
    columns: &ProgressColumns,
    report_date: NaiveDate,
    today: NaiveDate,
) -> Result<ProgressReport, AuditError> {
    let mut folders: IndexMap<String, Tally> = IndexMap::new();
    let mut folder_auditors: IndexMap<(String, String), Tally> = IndexMap::new();
    let mut auditors: IndexMap<String, Tally> = IndexMap::new();

    for input in inputs {
        let table = input.table;
        let name_idx = table.column_index(&columns.name)?;
        let status_idx = table.column_index(&columns.status)?;
        let date_idx = table.column_index(&columns.date).ok();
        let start_idx = table.column_index(&columns.start_time).ok();
        let end_idx = table.column_index(&columns.end_time).ok();

        for row in 0..table.len() {
            let date = date_idx
                .map(|idx| normalize_date(table.value(row, idx), today))
                .unwrap_or(today);
            if date != report_date {
                continue;
            }

            let seconds = match (start_idx, end_idx) {
                (Some(start), Some(end)) => {
                    coding_seconds(table.value(row, start), table.value(row, end))
                }
                _ => 0.0,
            };
            let completed = is_completed(table.value(row, status_idx));

            folders
                .entry(input.folder.to_string())
                .or_default()
                .absorb(completed, seconds);

            let Some(name) = table.value(row, name_idx).as_str() else {
                continue;
            };
            folder_auditors
                .entry((input.folder.to_string(), name.to_string()))
                .or_default()
                .absorb(completed, seconds);
            auditors
                .entry(name.to_string())
                .or_default()
                .absorb(completed, seconds);
        }
    }

    let folder_summary = tally_table(
        &[labels::FOLDER],
        folders
            .into_iter()
            .map(|(folder, tally)| (vec![Value::Text(folder)], tally))
            .collect(),
    );
    let auditor_summary = tally_table(
        &[labels::NAME],
        auditors
            .into_iter()
            .map(|(name, tally)| (vec![Value::Text(name)], tally))
            .collect(),
    );
    let folder_auditor_summary = tally_table(
        &[labels::FOLDER, labels::NAME],
        folder_auditors
            .into_iter()
            .map(|((folder, name), tally)| {
                (vec![Value::Text(folder), Value::Text(name)], tally)
            })
            .collect(),
    );

    Ok(ProgressReport {
        folder_summary,
        auditor_summary,
        folder_auditor_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn workbook(rows: &[(&str, &str, &str, &str, &str)]) -> Table {
        let mut table = Table::new(vec![
            labels::NAME.into(),
            labels::DATE.into(),
            labels::START_TIME.into(),
            labels::END_TIME.into(),
            labels::STATUS.into(),
        ]);
        for (name, date, start, end, status) in rows {
            let cell = |value: &str| {
                if value.is_empty() {
                    Value::Null
                } else {
                    text(value)
                }
            };
            table.push_row(Row(vec![
                cell(name),
                cell(date),
                cell(start),
                cell(end),
                cell(status),
            ]));
        }
        table
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).expect("valid date")
    }

    #[test]
    fn seconds_to_hms_formats_and_clamps() {
        assert_eq!(seconds_to_hms(0.0), "00:00:00");
        assert_eq!(seconds_to_hms(3_661.0), "01:01:01");
        assert_eq!(seconds_to_hms(-5.0), "00:00:00");
    }

    #[test]
    fn coding_seconds_from_day_fractions() {
        // 0.5 -> 12:00, 0.520833... -> 12:30 => 1800 seconds.
        let seconds = coding_seconds(&text("0.5"), &text("0.5208333333"));
        assert!((seconds - 1_800.0).abs() < 1.0);
        // End before start clamps to zero.
        assert_eq!(coding_seconds(&text("0.5"), &text("0.4")), 0.0);
        assert_eq!(coding_seconds(&Value::Null, &text("0.5")), 0.0);
    }

    #[test]
    fn rows_are_filtered_to_the_report_date() {
        let table = workbook(&[
            ("amy", "2025-03-01", "0.50", "0.55", "Done"),
            ("amy", "2025-03-02", "0.50", "0.55", "Done"),
        ]);
        let report = progress_report(
            &[ProgressInput {
                folder: "east",
                table: &table,
            }],
            &ProgressColumns::default(),
            date(1),
            date(5),
        )
        .expect("report");
        // One matching row plus the grand-totals row.
        assert_eq!(report.auditor_summary.len(), 2);
        assert_eq!(report.auditor_summary.value(0, 1), &Value::Number(1.0));
    }

    #[test]
    fn blank_dates_coerce_to_today() {
        let table = workbook(&[("amy", "", "", "", "")]);
        let report = progress_report(
            &[ProgressInput {
                folder: "east",
                table: &table,
            }],
            &ProgressColumns::default(),
            date(5),
            date(5),
        )
        .expect("report");
        assert_eq!(report.folder_summary.value(0, 2), &Value::Number(1.0));
    }

    #[test]
    fn blank_status_is_pending_everything_else_completed() {
        let table = workbook(&[
            ("amy", "2025-03-01", "", "", ""),
            ("amy", "2025-03-01", "", "", "Pending"),
            ("amy", "2025-03-01", "", "", "Reviewed"),
        ]);
        let report = progress_report(
            &[ProgressInput {
                folder: "east",
                table: &table,
            }],
            &ProgressColumns::default(),
            date(1),
            date(5),
        )
        .expect("report");
        let summary = &report.auditor_summary;
        assert_eq!(summary.value(0, 1), &Value::Number(1.0));
        assert_eq!(summary.value(0, 2), &Value::Number(2.0));
        assert_eq!(summary.value(0, 3), &Value::Number(3.0));
    }

    #[test]
    fn grand_totals_row_sums_folders() {
        let east = workbook(&[("amy", "2025-03-01", "0.5", "0.6", "Done")]);
        let west = workbook(&[("bob", "2025-03-01", "0.5", "0.7", "")]);
        let report = progress_report(
            &[
                ProgressInput {
                    folder: "east",
                    table: &east,
                },
                ProgressInput {
                    folder: "west",
                    table: &west,
                },
            ],
            &ProgressColumns::default(),
            date(1),
            date(5),
        )
        .expect("report");
        let summary = &report.folder_summary;
        assert_eq!(summary.len(), 3);
        let totals = summary.len() - 1;
        assert_eq!(summary.value(totals, 0), &text("Grand Totals"));
        assert_eq!(summary.value(totals, 3), &Value::Number(2.0));
        // 0.1 day + 0.2 day = 25920 seconds.
        assert_eq!(summary.value(totals, 4), &text("07:12:00"));
    }
}
