//! Export sink: named tables serialized as downloadable CSV files.

use std::path::Path;

use csv::WriterBuilder;

use crate::errors::AuditError;
use crate::table::Table;

/// A table paired with the file name (without extension) it exports under.
#[derive(Clone, Copy, Debug)]
pub struct NamedTable<'a> {
    /// File stem, e.g. `sampled_data`.
    pub name: &'a str,
    /// The table to serialize.
    pub table: &'a Table,
}

/// Serialize one table to CSV bytes: header row first, nulls as empty cells.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, AuditError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.0.iter().map(|value| value.render()))?;
    }
    writer
        .into_inner()
        .map_err(|err| AuditError::Io(err.into_error()))
}

/// Write each named table as `<name>.csv` under `dir`, creating it if needed.
pub fn write_dir(dir: &Path, tables: &[NamedTable<'_>]) -> Result<(), AuditError> {
    std::fs::create_dir_all(dir)?;
    for entry in tables {
        let bytes = to_csv_bytes(entry.table)?;
        std::fs::write(dir.join(format!("{}.csv", entry.name)), bytes)?;
    }
    Ok(())
}
