//! Seed query construction

use serde::{Deserialize, Serialize};

/// Default bulk-refresh cap
pub const DEFAULT_LIMIT: usize = 19_000;

/// Default tie-breaker column for the bulk-refresh ordering
pub const DEFAULT_SECONDARY_ORDER: &str = "original_file_name";

/// Which rows of the reference table a run processes
///
/// In TOML:
///
/// ```toml
/// [source.selection]
/// mode = "stalest"
/// limit = 19000
/// secondary_order = "original_file_name"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Selection {
    /// Every row, in table order
    All,

    /// Least recently updated rows first (never-updated rows lead), capped
    Stalest {
        /// Maximum rows per run
        #[serde(default = "default_limit")]
        limit: usize,

        /// Tie-breaker column after `last_updated`
        #[serde(default = "default_secondary_order")]
        secondary_order: String,
    },
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_secondary_order() -> String {
    DEFAULT_SECONDARY_ORDER.to_string()
}

impl Selection {
    /// Bulk-refresh selection with the default tie-breaker
    pub fn stalest(limit: usize) -> Self {
        Selection::Stalest {
            limit,
            secondary_order: default_secondary_order(),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::All
    }
}

/// The single query a run issues against its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedQuery {
    /// Reference table name
    pub table: String,

    /// Row selection
    pub selection: Selection,
}

impl SeedQuery {
    /// Create a query over `table`
    pub fn new(table: impl Into<String>, selection: Selection) -> Self {
        Self {
            table: table.into(),
            selection,
        }
    }

    /// Render the SQL; the dialect is shared by ClickHouse and SQLite
    pub fn to_sql(&self) -> String {
        match &self.selection {
            Selection::All => format!("SELECT * FROM {}", self.table),
            Selection::Stalest { limit, secondary_order } => format!(
                "SELECT * FROM {} ORDER BY last_updated NULLS FIRST, {} LIMIT {}",
                self.table, secondary_order, limit
            ),
        }
    }
}
