//! Seed records - the starting point of every company pass

use serde::{Deserialize, Serialize};

/// Per-company record produced by a record source
///
/// The same shape is sent to the lookup service as the request body, so the
/// field names on the wire match the stored column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedRecord {
    /// Row identifier in the source table
    pub uuid: String,

    /// Taxpayer identification number, the lookup key
    pub inn: String,

    /// Status carried over from the previous run; replaced by the MAIN record's status
    pub dadata_status: Option<String>,

    /// Newline-joined branch names, accumulated from BRANCH records
    pub dadata_branch_name: Option<String>,

    /// Newline-joined branch addresses
    pub dadata_branch_address: Option<String>,

    /// Newline-joined branch regions
    pub dadata_branch_region: Option<String>,

    /// Run start time (`YYYY-MM-DD HH:MM:SS`, local wall clock)
    pub last_updated: String,

    /// Whether the lookup service may answer from its cache
    pub from_cache: bool,
}

impl SeedRecord {
    /// Create a seed with empty branch accumulators
    pub fn new(
        uuid: impl Into<String>,
        inn: impl Into<String>,
        dadata_status: Option<String>,
        last_updated: impl Into<String>,
        from_cache: bool,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            inn: inn.into(),
            dadata_status,
            dadata_branch_name: Some(String::new()),
            dadata_branch_address: Some(String::new()),
            dadata_branch_region: Some(String::new()),
            last_updated: last_updated.into(),
            from_cache,
        }
    }

    /// Turn empty branch accumulators into `None`
    pub(crate) fn normalize_branches(&mut self) {
        for field in [
            &mut self.dadata_branch_name,
            &mut self.dadata_branch_address,
            &mut self.dadata_branch_region,
        ] {
            if field.as_deref().is_some_and(str::is_empty) {
                *field = None;
            }
        }
    }
}
