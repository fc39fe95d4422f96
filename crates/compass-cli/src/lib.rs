//! Compass CLI - the `compass-enrich` batch job.
//!
//! Configuration is assembled from an optional TOML file, then the
//! environment and flags (see [`Cli`]). The run itself is
//! [`compass_enricher::Enricher::run`] over a ClickHouse or SQLite source,
//! the HTTP lookup client and the JSON file sink.

pub mod cli;
pub mod error;
pub mod logging;

pub use cli::Cli;
pub use error::{CliError, Result};

use compass_domain::traits::RecordSource;
use compass_enricher::{Enricher, EnricherConfig, JsonFileSink, RunMetrics};
use compass_lookup::HttpLookup;
use compass_source::{ClickHouseSource, SqliteSource};
use std::fmt::Display;

/// Build the effective configuration: file first, then flags and environment
///
/// The result is validated.
pub fn load_config(cli: &Cli) -> Result<EnricherConfig> {
    let mut config = match &cli.config {
        Some(path) => EnricherConfig::from_toml_partial(&std::fs::read_to_string(path)?)?,
        None => EnricherConfig::default(),
    };

    cli.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Run one enrichment pass with the configured source
pub async fn execute(config: &EnricherConfig) -> Result<RunMetrics> {
    let query = config.source.seed_query();

    match &config.source.sqlite_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using SQLite snapshot");
            let source = SqliteSource::open(path, query)?.with_from_cache(config.seed_from_cache);
            enrich(config, &source).await
        }
        None => {
            let source = ClickHouseSource::new(config.source.clickhouse_settings(), query)
                .with_from_cache(config.seed_from_cache);
            enrich(config, &source).await
        }
    }
}

async fn enrich<R>(config: &EnricherConfig, source: &R) -> Result<RunMetrics>
where
    R: RecordSource,
    R::Error: Display,
{
    let lookup = HttpLookup::with_timeout(&config.lookup.host, config.lookup.port, config.lookup.timeout())?;
    let mut sink = JsonFileSink::from_config(&config.output);

    tracing::info!(
        lookup = %lookup.endpoint(),
        output = %sink.dir().display(),
        zone = %config.date_zone,
        "Starting enrichment run"
    );

    let mut enricher = Enricher::new(config.date_zone);
    let metrics = enricher.run(source, &lookup, &mut sink).await?;
    Ok(metrics)
}
