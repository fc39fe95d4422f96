//! Command-line arguments and how they override the config file.

use clap::Parser;
use compass_domain::DateZone;
use compass_enricher::EnricherConfig;
use std::path::PathBuf;

/// Enrich the company reference table from the registry lookup service.
///
/// Every option can also come from the environment (a `.env` file in the
/// working directory is read first) and overrides the config file.
#[derive(Debug, Parser)]
#[command(name = "compass-enrich")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// ClickHouse host
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// ClickHouse HTTP port
    #[arg(long)]
    pub port: Option<u16>,

    /// ClickHouse database
    #[arg(long, env = "DATABASE")]
    pub database: Option<String>,

    /// ClickHouse user
    #[arg(long, env = "USERNAME_DB")]
    pub username: Option<String>,

    /// ClickHouse password
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Reference table
    #[arg(long)]
    pub table: Option<String>,

    /// Read seeds from a SQLite snapshot instead of ClickHouse
    #[arg(long)]
    pub sqlite: Option<PathBuf>,

    /// Process the least recently updated rows first, up to --limit
    #[arg(long)]
    pub stalest: bool,

    /// Row cap for --stalest
    #[arg(long, requires = "stalest")]
    pub limit: Option<usize>,

    /// Lookup service host
    #[arg(long, env = "SERVICE_INN")]
    pub lookup_host: Option<String>,

    /// Lookup service port
    #[arg(long)]
    pub lookup_port: Option<u16>,

    /// Lookup timeout in seconds
    #[arg(long)]
    pub lookup_timeout: Option<u64>,

    /// Output base directory
    #[arg(short, long, env = "XL_IDP_PATH_REFERENCE")]
    pub output: Option<PathBuf>,

    /// Root directory for log files
    #[arg(long, env = "XL_IDP_ROOT_AUTO_UPDATE_SCRIPTS")]
    pub log_root: Option<PathBuf>,

    /// Zone for registry dates: utc, local or an offset like +03:00
    #[arg(long)]
    pub date_zone: Option<DateZone>,

    /// Allow the lookup service to answer from its cache
    #[arg(long)]
    pub from_cache: bool,
}

impl Cli {
    /// Apply every option that was given on top of `config`
    pub fn apply(&self, config: &mut EnricherConfig) {
        let source = &mut config.source;
        if let Some(host) = &self.host {
            source.host = host.clone();
        }
        if let Some(port) = self.port {
            source.port = port;
        }
        if let Some(database) = &self.database {
            source.database = database.clone();
        }
        if let Some(username) = &self.username {
            source.username = username.clone();
        }
        if let Some(password) = &self.password {
            source.password = password.clone();
        }
        if let Some(table) = &self.table {
            source.table = table.clone();
        }
        if let Some(path) = &self.sqlite {
            source.sqlite_path = Some(path.clone());
        }
        if self.stalest {
            source.use_stalest(self.limit);
        }

        let lookup = &mut config.lookup;
        if let Some(host) = &self.lookup_host {
            lookup.host = host.clone();
        }
        if let Some(port) = self.lookup_port {
            lookup.port = port;
        }
        if let Some(timeout) = self.lookup_timeout {
            lookup.timeout_secs = timeout;
        }

        if let Some(output) = &self.output {
            config.output.base_path = output.clone();
        }
        if let Some(zone) = self.date_zone {
            config.date_zone = zone;
        }
        if self.from_cache {
            config.seed_from_cache = true;
        }
    }
}
