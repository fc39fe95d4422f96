//! Compass Enricher
//!
//! Drives one enrichment run: fetch seeds once, look each company up, fold the
//! returned branch records into an [`EnrichedRecord`](compass_domain::EnrichedRecord)
//! and write it out.
//!
//! # Overview
//!
//! The enricher is responsible for:
//! - **Orchestration**: the sequential per-company loop in [`Enricher::run`]
//! - **Failure policy**: which failures end the run and which only cost one company or one branch record
//! - **Output**: one pretty-printed JSON file per company via [`JsonFileSink`]
//! - **Metrics**: counts of lookups, mapped records and writes per run
//!
//! ## Failure Policy
//!
//! | Failure | Scope | Effect |
//! |---------|-------|--------|
//! | **Source** | Run | Fatal, nothing is written |
//! | **Lookup** | Company | Record written without enrichment |
//! | **Mapping** | Branch record | Record skipped, next one mapped |
//! | **Sink** | Run | Fatal |
//!
//! # Usage
//!
//! ```no_run
//! use compass_enricher::{Enricher, EnricherConfig, JsonFileSink};
//! use compass_lookup::HttpLookup;
//! use compass_source::ClickHouseSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EnricherConfig::from_file("compass.toml")?;
//!
//!     let source = ClickHouseSource::new(config.source.clickhouse_settings(), config.source.seed_query());
//!     let lookup = HttpLookup::with_timeout(&config.lookup.host, config.lookup.port, config.lookup.timeout())?;
//!     let mut sink = JsonFileSink::from_config(&config.output);
//!
//!     let mut enricher = Enricher::new(config.date_zone);
//!     let metrics = enricher.run(&source, &lookup, &mut sink).await?;
//!     println!("{}", metrics.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! date_zone = "utc"
//! seed_from_cache = false
//!
//! [source]
//! host = "clickhouse.internal"
//! port = 8123
//! database = "reference"
//! username = "reader"
//! password = "secret"
//! table = "reference_compass"
//!
//! [source.selection]
//! mode = "stalest"
//! limit = 19000
//!
//! [lookup]
//! host = "enrichment.internal"
//! port = 8003
//! timeout_secs = 30
//!
//! [output]
//! base_path = "/data/reference"
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod enricher;
pub mod error;
pub mod metrics;
pub mod sink;

pub use config::{EnricherConfig, LookupConfig, OutputConfig, SourceConfig};
pub use enricher::{Enricher, Stage};
pub use error::{ConfigError, EnricherError};
pub use metrics::RunMetrics;
pub use sink::{JsonFileSink, SinkError};
