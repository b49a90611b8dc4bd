//! Predicate-based row filtering over named columns.
//!
//! Predicates combine with logical AND and are pure over the input table.
//! Null cells never match positive checks (`Contains`, `Equals`, `In`) and
//! always match their negations; this mirrors how blank spreadsheet cells
//! behave in the upstream workflow.

use std::collections::HashSet;

use crate::errors::AuditError;
use crate::table::{Table, Value};
use crate::types::ColumnName;

/// A single column predicate.
#[derive(Clone, Debug)]
pub enum Predicate {
    /// Cell contains `needle`. Null cells never match.
    Contains {
        column: ColumnName,
        needle: String,
        case_insensitive: bool,
    },
    /// Cell does not contain `needle`. Null cells match.
    NotContains {
        column: ColumnName,
        needle: String,
        case_insensitive: bool,
    },
    /// Cell equals `value` exactly. Null cells never match.
    Equals { column: ColumnName, value: String },
    /// Cell differs from `value`. Null cells match.
    NotEquals { column: ColumnName, value: String },
    /// Cell is present (non-null).
    NotNull { column: ColumnName },
    /// Cell is missing (null).
    IsNull { column: ColumnName },
    /// Cell is one of `allowed`. Null cells never match.
    In {
        column: ColumnName,
        allowed: HashSet<String>,
    },
}

impl Predicate {
    fn column(&self) -> &str {
        match self {
            Predicate::Contains { column, .. }
            | Predicate::NotContains { column, .. }
            | Predicate::Equals { column, .. }
            | Predicate::NotEquals { column, .. }
            | Predicate::NotNull { column }
            | Predicate::IsNull { column }
            | Predicate::In { column, .. } => column,
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Predicate::Contains {
                needle,
                case_insensitive,
                ..
            } => contains(value, needle, *case_insensitive),
            Predicate::NotContains {
                needle,
                case_insensitive,
                ..
            } => !contains(value, needle, *case_insensitive),
            Predicate::Equals { value: expected, .. } => value.as_str() == Some(expected),
            Predicate::NotEquals { value: expected, .. } => value.as_str() != Some(expected),
            Predicate::NotNull { .. } => !value.is_null(),
            Predicate::IsNull { .. } => value.is_null(),
            Predicate::In { allowed, .. } => value
                .as_str()
                .map(|text| allowed.contains(text))
                .unwrap_or(false),
        }
    }
}

fn contains(value: &Value, needle: &str, case_insensitive: bool) -> bool {
    let Some(text) = value.as_str() else {
        return false;
    };
    if case_insensitive {
        text.to_lowercase().contains(&needle.to_lowercase())
    } else {
        text.contains(needle)
    }
}

/// Return the subset of rows satisfying all predicates.
///
/// Every referenced column is resolved up front; an unknown column name is a
/// schema error before any row is inspected.
pub fn apply(table: &Table, predicates: &[Predicate]) -> Result<Table, AuditError> {
    let resolved: Vec<(usize, &Predicate)> = predicates
        .iter()
        .map(|predicate| Ok((table.column_index(predicate.column())?, predicate)))
        .collect::<Result<_, AuditError>>()?;

    let keep: Vec<usize> = (0..table.len())
        .filter(|&row| {
            resolved
                .iter()
                .all(|(idx, predicate)| predicate.matches(table.value(row, *idx)))
        })
        .collect();
    Ok(table.select(&keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn fixture() -> Table {
        let mut table = Table::new(vec!["User".into(), "Tool".into(), "Desc".into()]);
        table.push_row(Row(vec![text("alice"), text("Item Coding"), text("BEER|X")]));
        table.push_row(Row(vec![text("OGRDS SYSTEM"), text("MANUAL"), text("TEA|Y")]));
        table.push_row(Row(vec![text("bob"), text("MANUAL"), Value::Null]));
        table.push_row(Row(vec![text("carol"), Value::Null, text("SIDES|Z")]));
        table
    }

    #[test]
    fn predicates_combine_with_logical_and() {
        let table = fixture();
        let filtered = apply(
            &table,
            &[
                Predicate::NotContains {
                    column: "User".into(),
                    needle: "OGRDS SYSTEM".into(),
                    case_insensitive: false,
                },
                Predicate::NotContains {
                    column: "Tool".into(),
                    needle: "ITEM CODING".into(),
                    case_insensitive: true,
                },
                Predicate::NotNull {
                    column: "Desc".into(),
                },
            ],
        )
        .expect("filter");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.value(0, 0), &text("carol"));
    }

    #[test]
    fn null_cells_fail_contains_but_pass_not_contains() {
        let table = fixture();
        let contains = apply(
            &table,
            &[Predicate::Contains {
                column: "Tool".into(),
                needle: "MANUAL".into(),
                case_insensitive: false,
            }],
        )
        .expect("filter");
        assert_eq!(contains.len(), 2);

        let not_contains = apply(
            &table,
            &[Predicate::NotContains {
                column: "Tool".into(),
                needle: "MANUAL".into(),
                case_insensitive: false,
            }],
        )
        .expect("filter");
        // The null-tool row counts as a non-match for contains.
        assert_eq!(not_contains.len(), 2);
    }

    #[test]
    fn is_null_matches_only_missing_cells() {
        let table = fixture();
        let nulls = apply(
            &table,
            &[Predicate::IsNull {
                column: "Desc".into(),
            }],
        )
        .expect("filter");
        assert_eq!(nulls.len(), 1);
        assert_eq!(nulls.value(0, 0), &text("bob"));
    }

    #[test]
    fn in_predicate_restricts_to_allowed_set() {
        let table = fixture();
        let allowed: HashSet<String> = ["alice", "bob"].iter().map(|s| s.to_string()).collect();
        let filtered = apply(
            &table,
            &[Predicate::In {
                column: "User".into(),
                allowed,
            }],
        )
        .expect("filter");
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn unknown_column_is_a_schema_error() {
        let table = fixture();
        let err = apply(
            &table,
            &[Predicate::NotNull {
                column: "Missing".into(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, AuditError::Schema { column } if column == "Missing"));
    }
}
