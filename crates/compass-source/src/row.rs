//! Positional row conversion

use crate::SourceError;
use compass_domain::SeedRecord;
use serde_json::Value;

/// Column holding the row uuid
pub const UUID_COLUMN: usize = 0;

/// Column holding the INN
pub const INN_COLUMN: usize = 1;

/// Column holding the previous status
pub const STATUS_COLUMN: usize = 32;

/// Minimum number of columns a row must have
pub const MIN_COLUMNS: usize = STATUS_COLUMN + 1;

/// Wall-clock run start, formatted for `last_updated`
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Convert all rows of a query result into seeds
///
/// Every seed shares the same `last_updated` and `from_cache`. An empty result
/// is an error: a reference table without rows means the source is broken.
pub fn seeds_from_rows(
    rows: Vec<Vec<Value>>,
    last_updated: &str,
    from_cache: bool,
) -> Result<Vec<SeedRecord>, SourceError> {
    if rows.is_empty() {
        return Err(SourceError::Empty);
    }

    rows.iter()
        .enumerate()
        .map(|(position, row)| seed_from_row(position, row, last_updated, from_cache))
        .collect()
}

fn seed_from_row(
    position: usize,
    row: &[Value],
    last_updated: &str,
    from_cache: bool,
) -> Result<SeedRecord, SourceError> {
    if row.len() < MIN_COLUMNS {
        return Err(SourceError::InvalidRow {
            row: position,
            reason: format!("expected at least {} columns, got {}", MIN_COLUMNS, row.len()),
        });
    }

    let required = |column: usize, name: &str| {
        as_text(&row[column]).ok_or_else(|| SourceError::InvalidRow {
            row: position,
            reason: format!("{} (column {}) is null", name, column),
        })
    };

    Ok(SeedRecord::new(
        required(UUID_COLUMN, "uuid")?,
        required(INN_COLUMN, "inn")?,
        as_text(&row[STATUS_COLUMN]),
        last_updated,
        from_cache,
    ))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
