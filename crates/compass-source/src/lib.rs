//! Compass Record Sources
//!
//! Implements the `RecordSource` trait from `compass-domain`.
//!
//! # Sources
//!
//! - `ClickHouseSource`: the reference table queried over ClickHouse's HTTP interface
//! - `SqliteSource`: the same query against a SQLite snapshot of the table
//!
//! Both run a [`SeedQuery`] once and turn each positional row into a
//! [`SeedRecord`](compass_domain::SeedRecord): column 0 is the uuid, column 1
//! the INN and column 32 the previous status.
//!
//! # Examples
//!
//! ```
//! use compass_source::{SeedQuery, Selection};
//!
//! let query = SeedQuery::new("reference_compass", Selection::stalest(19_000));
//! assert_eq!(
//!     query.to_sql(),
//!     "SELECT * FROM reference_compass ORDER BY last_updated NULLS FIRST, original_file_name LIMIT 19000"
//! );
//! ```

#![warn(missing_docs)]

pub mod clickhouse;
pub mod query;
pub mod row;
pub mod sqlite;

use thiserror::Error;

pub use clickhouse::{ClickHouseSettings, ClickHouseSource};
pub use query::{SeedQuery, Selection};
pub use sqlite::SqliteSource;

/// Errors that can occur while fetching seeds
///
/// Any of these makes the run impossible; callers treat them as fatal.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Could not reach the datastore
    #[error("Connection error: {0}")]
    Connection(String),

    /// The datastore rejected the query or returned something unreadable
    #[error("Query error: {0}")]
    Query(String),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A row does not have the expected positional layout
    #[error("Invalid row {row}: {reason}")]
    InvalidRow {
        /// 0-based row position
        row: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The query returned no rows
    #[error("Query returned no rows")]
    Empty,
}
