use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::errors::AuditError;
use crate::types::ColumnName;

/// A single cell value.
///
/// CSV ingest only produces `Null` (empty cell) and `Text`; `Number` cells
/// are created by the aggregators. Keeping raw cells as text preserves
/// external codes with leading zeros.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Missing/blank cell.
    Null,
    /// Raw text cell.
    Text(String),
    /// Numeric cell produced by summaries and reports.
    Number(f64),
}

impl Value {
    /// Whether this cell is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text view of the cell; `None` for null and numeric cells.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric view of the cell, parsing text cells when possible.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            Value::Text(text) => text.trim().parse().ok(),
            Value::Null => None,
        }
    }

    /// Render the cell the way the CSV export writes it.
    ///
    /// Nulls render empty; whole numbers drop the fraction; everything else
    /// keeps two decimal places (coverage percentages).
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(text) => text.clone(),
            Value::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    format!("{value:.2}")
                }
            }
        }
    }
}

/// One row of cell values, aligned to the owning table's columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Row(pub Vec<Value>);

/// In-memory row store loaded wholesale from one uploaded export.
///
/// Column names are matched case-sensitively; a lookup for a column the
/// export does not carry is a schema error and aborts the run before any
/// sampling happens.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: Vec<ColumnName>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given column headers.
    pub fn new(columns: Vec<ColumnName>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Load a table from CSV with a header row. Empty cells become `Null`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, AuditError> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let columns: Vec<ColumnName> = csv_reader
            .headers()?
            .iter()
            .map(|header| header.to_string())
            .collect();
        let mut table = Table::new(columns);
        for record in csv_reader.records() {
            let record = record?;
            let row = Row(record
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::Text(cell.to_string())
                    }
                })
                .collect());
            table.push_row(row);
        }
        Ok(table)
    }

    /// Load a table from a CSV file on disk.
    pub fn from_csv_path(path: &Path) -> Result<Self, AuditError> {
        Self::from_csv_reader(File::open(path)?)
    }

    /// Column headers in order.
    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Row) {
        row.0.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Resolve a column header to its index (case-sensitive, fail fast).
    pub fn column_index(&self, name: &str) -> Result<usize, AuditError> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| AuditError::Schema {
                column: name.to_string(),
            })
    }

    /// Cell at (row, column index).
    pub fn value(&self, row: usize, column: usize) -> &Value {
        &self.rows[row].0[column]
    }

    /// New table containing the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&idx| self.rows[idx].clone()).collect(),
        }
    }

    /// Append a column of values, padding short inputs with `Null`.
    pub fn with_column(mut self, name: impl Into<ColumnName>, values: Vec<Value>) -> Table {
        self.columns.push(name.into());
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.0.push(values.next().unwrap_or(Value::Null));
        }
        self
    }

    /// Append a column derived from an existing one.
    pub fn derive_column<F>(&self, source: &str, name: &str, derive: F) -> Result<Table, AuditError>
    where
        F: Fn(&Value) -> Value,
    {
        let idx = self.column_index(source)?;
        let values = self.rows.iter().map(|row| derive(&row.0[idx])).collect();
        Ok(self.clone().with_column(name, values))
    }

    /// Keep the first row per key in `column`. Null keys are all kept.
    pub fn dedup_by(&self, column: &str) -> Result<Table, AuditError> {
        let idx = self.column_index(column)?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut keep = Vec::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            match &row.0[idx] {
                Value::Null => keep.push(row_idx),
                value => {
                    if seen.insert(value.render()) {
                        keep.push(row_idx);
                    }
                }
            }
        }
        Ok(self.select(&keep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn sample_table() -> Table {
        let mut table = Table::new(vec!["Code".into(), "User".into()]);
        table.push_row(Row(vec![text("A1"), text("alice")]));
        table.push_row(Row(vec![text("A2"), text("bob")]));
        table.push_row(Row(vec![text("A1"), text("bob")]));
        table.push_row(Row(vec![Value::Null, text("carol")]));
        table
    }

    #[test]
    fn from_csv_reader_maps_empty_cells_to_null() {
        let input = "Code,User\nA1,alice\n,bob\n";
        let table = Table::from_csv_reader(input.as_bytes()).expect("parse");
        assert_eq!(table.columns(), ["Code", "User"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, 0), &text("A1"));
        assert!(table.value(1, 0).is_null());
    }

    #[test]
    fn column_index_is_case_sensitive_and_fails_fast() {
        let table = sample_table();
        assert_eq!(table.column_index("Code").unwrap(), 0);
        let err = table.column_index("code").unwrap_err();
        assert!(matches!(err, AuditError::Schema { column } if column == "code"));
    }

    #[test]
    fn dedup_by_keeps_first_occurrence_and_all_nulls() {
        let table = sample_table();
        let deduped = table.dedup_by("Code").expect("dedup");
        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped.value(0, 1), &text("alice"));
        assert!(deduped.value(2, 0).is_null());
    }

    #[test]
    fn with_column_pads_missing_values() {
        let table = sample_table().with_column("Extra", vec![text("x")]);
        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.value(0, 2), &text("x"));
        assert!(table.value(3, 2).is_null());
    }

    #[test]
    fn render_formats_numbers_cleanly() {
        assert_eq!(Value::Number(3.0).render(), "3");
        assert_eq!(Value::Number(33.3333).render(), "33.33");
        assert_eq!(Value::Null.render(), "");
    }
}
