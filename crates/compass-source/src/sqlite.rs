//! SQLite snapshot source

use crate::row::{run_timestamp, seeds_from_rows};
use crate::{SeedQuery, SourceError};
use compass_domain::traits::RecordSource;
use compass_domain::SeedRecord;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;

/// Record source backed by a SQLite copy of the reference table
///
/// SQLite connections are not thread-safe; the source is meant to be used
/// from the single task that drives a run.
///
/// # Examples
///
/// ```no_run
/// use compass_source::{SeedQuery, Selection, SqliteSource};
///
/// let source = SqliteSource::open("reference.db", SeedQuery::new("reference_compass", Selection::All)).unwrap();
/// ```
pub struct SqliteSource {
    conn: Connection,
    query: SeedQuery,
    from_cache: bool,
}

impl SqliteSource {
    /// Open a database file
    pub fn open<P: AsRef<Path>>(path: P, query: SeedQuery) -> Result<Self, SourceError> {
        let conn = Connection::open(path)?;
        Ok(Self::from_connection(conn, query))
    }

    /// Wrap an existing connection (e.g. `:memory:` in tests)
    pub fn from_connection(conn: Connection, query: SeedQuery) -> Self {
        Self {
            conn,
            query,
            from_cache: false,
        }
    }

    /// Set the cache flag every seed carries to the lookup service
    pub fn with_from_cache(mut self, from_cache: bool) -> Self {
        self.from_cache = from_cache;
        self
    }

    /// Access the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn query_rows(&self) -> Result<Vec<Vec<Value>>, SourceError> {
        let mut stmt = self.conn.prepare(&self.query.to_sql())?;
        let column_count = stmt.column_count();

        let rows = stmt.query_map([], |row| {
            (0..column_count)
                .map(|i| row.get_ref(i).map(json_value))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let rows = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl RecordSource for SqliteSource {
    type Error = SourceError;

    async fn fetch_seeds(&self) -> Result<Vec<SeedRecord>, Self::Error> {
        tracing::info!(sql = %self.query.to_sql(), "Will read SQLite snapshot");

        let rows = self.query_rows()?;
        let seeds = seeds_from_rows(rows, &run_timestamp(), self.from_cache)?;

        tracing::info!(seeds = seeds.len(), "Read SQLite snapshot");
        Ok(seeds)
    }
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(bytes.iter().map(|b| format!("{:02x}", b)).collect()),
    }
}
