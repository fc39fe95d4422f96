//! Compass Lookup Layer
//!
//! Implementations of the `LookupClient` trait from `compass-domain`.
//!
//! # Clients
//!
//! - `MockLookup`: Deterministic in-memory client for testing
//! - `HttpLookup`: The enrichment service over plain HTTP
//!
//! # Examples
//!
//! ```
//! use compass_domain::{LookupResponse, SeedRecord};
//! use compass_domain::traits::LookupClient;
//! use compass_lookup::MockLookup;
//!
//! let mut lookup = MockLookup::default();
//! lookup.add_response("7707083893", LookupResponse::new(Vec::new(), true));
//!
//! let seed = SeedRecord::new("u", "7707083893", None, "2024-01-01 00:00:00", false);
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let response = runtime.block_on(lookup.lookup(&seed)).unwrap();
//! assert!(response.from_cache);
//! assert_eq!(lookup.call_count(), 1);
//! ```

#![warn(missing_docs)]

pub mod http;

use compass_domain::traits::LookupClient;
use compass_domain::{LookupResponse, SeedRecord};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use http::HttpLookup;

/// Errors that can occur during a lookup
///
/// All of them are recoverable for the run: the company is written without
/// enrichment and processing moves on.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The service answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// The body is not a `[branches, from_cache]` pair
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be constructed
    #[error("Client setup failed: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            LookupError::Setup(e.to_string())
        } else if e.is_decode() {
            LookupError::InvalidResponse(e.to_string())
        } else {
            LookupError::Communication(e.to_string())
        }
    }
}

/// Mock lookup client for deterministic testing
///
/// Returns pre-configured responses keyed by INN without any network calls.
/// Unknown INNs get an empty branch list.
///
/// # Examples
///
/// ```
/// use compass_lookup::MockLookup;
///
/// let mut lookup = MockLookup::default();
/// lookup.add_error("0000000000");
/// assert_eq!(lookup.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockLookup {
    responses: HashMap<String, LookupResponse>,
    failing: HashSet<String>,
    call_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<SeedRecord>>>,
}

impl MockLookup {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for a given INN
    pub fn add_response(&mut self, inn: impl Into<String>, response: LookupResponse) {
        self.responses.insert(inn.into(), response);
    }

    /// Configure a transport error for a given INN
    pub fn add_error(&mut self, inn: impl Into<String>) {
        self.failing.insert(inn.into());
    }

    /// Number of lookups performed
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Seeds received so far, in call order
    pub fn requests(&self) -> Vec<SeedRecord> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl LookupClient for MockLookup {
    type Error = LookupError;

    async fn lookup(&self, seed: &SeedRecord) -> Result<LookupResponse, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(seed.clone());
        }

        if self.failing.contains(&seed.inn) {
            return Err(LookupError::Communication("Mock connection refused".to_string()));
        }

        Ok(self.responses.get(&seed.inn).cloned().unwrap_or_default())
    }
}
