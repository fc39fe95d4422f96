//! Configuration for enrichment runs
//!
//! Every section has defaults, so a config file only needs the values that
//! differ; command-line flags are applied on top by the binary.

use crate::ConfigError;
use compass_domain::DateZone;
use compass_source::query::DEFAULT_LIMIT;
use compass_source::{ClickHouseSettings, SeedQuery, Selection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default reference table
pub const DEFAULT_TABLE: &str = "reference_compass";

/// Default output subdirectory under the base path
pub const DEFAULT_SUBDIRECTORY: &str = "reference_compass/update";

/// Default output file prefix
pub const DEFAULT_FILE_PREFIX: &str = "update";

/// Top-level configuration
///
/// # Examples
///
/// ```
/// use compass_enricher::EnricherConfig;
///
/// let config = EnricherConfig::from_toml(r#"
///     [source]
///     host = "clickhouse.internal"
///     database = "reference"
///
///     [lookup]
///     host = "enrichment.internal"
///
///     [output]
///     base_path = "/data/reference"
/// "#).unwrap();
///
/// assert_eq!(config.source.port, 8123);
/// assert_eq!(config.lookup.port, 8003);
/// assert_eq!(config.output.dir().to_str(), Some("/data/reference/reference_compass/update"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnricherConfig {
    /// Where seeds come from
    #[serde(default)]
    pub source: SourceConfig,

    /// The enrichment service
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Where records go
    #[serde(default)]
    pub output: OutputConfig,

    /// Zone for registration and liquidation dates
    #[serde(default)]
    pub date_zone: DateZone,

    /// Cache flag stamped on every seed sent to the lookup service
    #[serde(default)]
    pub seed_from_cache: bool,
}

impl EnricherConfig {
    /// Load and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EnricherConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text without validating, for configs that will be
    /// completed by command-line overrides
    pub fn from_toml_partial(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check that a run can be started with this configuration
    ///
    /// ClickHouse connection fields are only required when no SQLite
    /// snapshot is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.sqlite_path.is_none() {
            if self.source.host.trim().is_empty() {
                return Err(ConfigError::MissingField("source.host".to_string()));
            }
            if self.source.database.trim().is_empty() {
                return Err(ConfigError::MissingField("source.database".to_string()));
            }
        }
        if self.source.table.trim().is_empty() {
            return Err(ConfigError::MissingField("source.table".to_string()));
        }
        if let Selection::Stalest { limit, secondary_order } = &self.source.selection {
            if *limit == 0 {
                return Err(ConfigError::Invalid("source.selection.limit must be positive".to_string()));
            }
            if secondary_order.trim().is_empty() {
                return Err(ConfigError::MissingField("source.selection.secondary_order".to_string()));
            }
        }

        if self.lookup.host.trim().is_empty() {
            return Err(ConfigError::MissingField("lookup.host".to_string()));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(ConfigError::Invalid("lookup.timeout_secs must be positive".to_string()));
        }

        if self.output.base_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("output.base_path".to_string()));
        }
        if self.output.file_prefix.trim().is_empty() {
            return Err(ConfigError::MissingField("output.file_prefix".to_string()));
        }

        Ok(())
    }
}

/// Record source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// ClickHouse host
    pub host: String,

    /// ClickHouse HTTP port
    pub port: u16,

    /// Database holding the reference table
    pub database: String,

    /// User name
    pub username: String,

    /// Password
    pub password: String,

    /// Reference table
    pub table: String,

    /// Which rows to process
    pub selection: Selection,

    /// Read from a SQLite snapshot instead of ClickHouse
    pub sqlite_path: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: compass_source::clickhouse::DEFAULT_PORT,
            database: String::new(),
            username: String::new(),
            password: String::new(),
            table: DEFAULT_TABLE.to_string(),
            selection: Selection::All,
            sqlite_path: None,
        }
    }
}

impl SourceConfig {
    /// ClickHouse connection settings
    pub fn clickhouse_settings(&self) -> ClickHouseSettings {
        ClickHouseSettings {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    /// The query a run issues
    pub fn seed_query(&self) -> SeedQuery {
        SeedQuery::new(self.table.clone(), self.selection.clone())
    }

    /// Switch to bulk-refresh selection, keeping a configured tie-breaker
    pub fn use_stalest(&mut self, limit: Option<usize>) {
        self.selection = match &self.selection {
            Selection::Stalest { limit: current, secondary_order } => Selection::Stalest {
                limit: limit.unwrap_or(*current),
                secondary_order: secondary_order.clone(),
            },
            Selection::All => Selection::stalest(limit.unwrap_or(DEFAULT_LIMIT)),
        };
    }
}

/// Lookup service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Service host
    pub host: String,

    /// Service port
    pub port: u16,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: compass_lookup::http::DEFAULT_PORT,
            timeout_secs: compass_lookup::http::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LookupConfig {
    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base directory
    pub base_path: PathBuf,

    /// Subdirectory under `base_path` receiving the files
    pub subdirectory: String,

    /// File name prefix; files are `{prefix}_{index}.json`
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::new(),
            subdirectory: DEFAULT_SUBDIRECTORY.to_string(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl OutputConfig {
    /// Directory receiving the files
    pub fn dir(&self) -> PathBuf {
        self.base_path.join(&self.subdirectory)
    }
}
