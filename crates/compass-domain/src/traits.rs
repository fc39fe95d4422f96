//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the mapping logic and the I/O
//! around it. Implementations live in other crates.

use crate::{EnrichedRecord, LookupResponse, SeedRecord};
use std::path::PathBuf;

/// Supplies the ordered list of companies for one run
///
/// Implemented by the infrastructure layer (compass-source)
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    /// Error type for source operations
    type Error;

    /// Fetch all seeds for this run, in processing order
    ///
    /// Called exactly once per run; an empty result is an error.
    async fn fetch_seeds(&self) -> Result<Vec<SeedRecord>, Self::Error>;
}

/// Looks up registry data for one company
///
/// Implemented by the infrastructure layer (compass-lookup)
#[allow(async_fn_in_trait)]
pub trait LookupClient {
    /// Error type for lookup operations
    type Error;

    /// Send the seed to the lookup service and return its branch list
    async fn lookup(&self, seed: &SeedRecord) -> Result<LookupResponse, Self::Error>;
}

/// Persists finalized records
///
/// Implemented by the application layer (compass-enricher)
pub trait RecordSink {
    /// Error type for sink operations
    type Error;

    /// Write one record under its run index, returning where it went
    fn write(&mut self, index: usize, record: &EnrichedRecord) -> Result<PathBuf, Self::Error>;
}
