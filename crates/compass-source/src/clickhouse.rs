//! ClickHouse source over the HTTP interface
//!
//! The query is posted as the request body with `FORMAT JSONCompact`
//! appended, so every row comes back as a positional JSON array.

use crate::row::{run_timestamp, seeds_from_rows};
use crate::{SeedQuery, SourceError};
use compass_domain::traits::RecordSource;
use compass_domain::SeedRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default ClickHouse HTTP port
pub const DEFAULT_PORT: u16 = 8123;

/// Connection settings for ClickHouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickHouseSettings {
    /// Server host
    pub host: String,

    /// HTTP interface port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database holding the reference table
    pub database: String,

    /// User name
    #[serde(default)]
    pub username: String,

    /// Password
    #[serde(default)]
    pub password: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ClickHouseSettings {
    /// Endpoint URL with the database selected
    pub fn url(&self) -> String {
        format!("http://{}:{}/?database={}", self.host, self.port, self.database)
    }
}

/// Body of a `FORMAT JSONCompact` answer; only the rows matter here
#[derive(Deserialize)]
struct JsonCompact {
    data: Vec<Vec<Value>>,
}

/// Record source backed by a ClickHouse table
pub struct ClickHouseSource {
    settings: ClickHouseSettings,
    query: SeedQuery,
    from_cache: bool,
    client: reqwest::Client,
}

impl ClickHouseSource {
    /// Create a source; nothing is sent until [`RecordSource::fetch_seeds`]
    pub fn new(settings: ClickHouseSettings, query: SeedQuery) -> Self {
        Self {
            settings,
            query,
            from_cache: false,
            client: reqwest::Client::new(),
        }
    }

    /// Set the cache flag every seed carries to the lookup service
    pub fn with_from_cache(mut self, from_cache: bool) -> Self {
        self.from_cache = from_cache;
        self
    }

    /// Rows of the seed query, in result order
    async fn query_rows(&self) -> Result<Vec<Vec<Value>>, SourceError> {
        let sql = format!("{} FORMAT JSONCompact", self.query.to_sql());
        tracing::debug!(sql = %sql, "Querying ClickHouse");

        let response = self
            .client
            .post(self.settings.url())
            .header("X-ClickHouse-User", &self.settings.username)
            .header("X-ClickHouse-Key", &self.settings.password)
            .body(sql)
            .send()
            .await
            .map_err(|e| SourceError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SourceError::Query(format!("HTTP {}: {}", status, body.trim())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Connection(e.to_string()))?;
        let result: JsonCompact = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::Query(format!("Failed to parse result: {}", e)))?;

        Ok(result.data)
    }
}

impl RecordSource for ClickHouseSource {
    type Error = SourceError;

    async fn fetch_seeds(&self) -> Result<Vec<SeedRecord>, Self::Error> {
        tracing::info!(
            host = %self.settings.host,
            database = %self.settings.database,
            "Will connect to db"
        );

        let rows = self.query_rows().await?;
        let seeds = seeds_from_rows(rows, &run_timestamp(), self.from_cache)?;

        tracing::info!(seeds = seeds.len(), "Connected to db");
        Ok(seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        let settings = ClickHouseSettings {
            host: "ch.internal".to_string(),
            port: DEFAULT_PORT,
            database: "reference".to_string(),
            username: "reader".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(settings.url(), "http://ch.internal:8123/?database=reference");
    }

    #[test]
    fn test_parse_json_compact() {
        let body = r#"{
            "meta": [{"name": "uuid", "type": "UUID"}, {"name": "inn", "type": "String"}],
            "data": [["a1b2", "7707083893"], ["c3d4", "7736050003"]],
            "rows": 2,
            "statistics": {"elapsed": 0.001, "rows_read": 2, "bytes_read": 64}
        }"#;

        let parsed: JsonCompact = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[1][1], "7736050003");
    }
}
