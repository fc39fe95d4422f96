//! HTTP client for the enrichment service
//!
//! The service takes the seed record as a JSON body and answers with
//! `[branches, from_cache]`. Each company gets exactly one attempt; there is
//! no retry, and any failure is reported to the caller to be logged.
//!
//! # Examples
//!
//! ```no_run
//! use compass_lookup::HttpLookup;
//!
//! let lookup = HttpLookup::new("service-inn", 8003).unwrap();
//! assert_eq!(lookup.endpoint(), "http://service-inn:8003");
//! ```

use crate::LookupError;
use compass_domain::traits::LookupClient;
use compass_domain::{LookupResponse, SeedRecord};
use std::time::Duration;

/// Default port of the enrichment service
pub const DEFAULT_PORT: u16 = 8003;

/// Default timeout for a lookup request (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Lookup client talking to the enrichment service
#[derive(Debug, Clone)]
pub struct HttpLookup {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpLookup {
    /// Create a client for `http://{host}:{port}` with the default timeout
    pub fn new(host: &str, port: u16) -> Result<Self, LookupError> {
        Self::with_timeout(host, port, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(host: &str, port: u16, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: format!("http://{}:{}", host, port),
            client,
        })
    }

    /// Full service URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LookupClient for HttpLookup {
    type Error = LookupError;

    async fn lookup(&self, seed: &SeedRecord) -> Result<LookupResponse, Self::Error> {
        tracing::debug!(inn = %seed.inn, endpoint = %self.endpoint, "Sending lookup request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(seed)
            .send()
            .await
            .map_err(|e| LookupError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| LookupError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}
