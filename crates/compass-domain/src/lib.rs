//! Compass Domain Layer
//!
//! This crate holds the data model and the pure mapping logic for company
//! enrichment. It knows nothing about databases, HTTP or the filesystem; those
//! live in other crates and plug in through the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Seed**: the per-company record produced by a record source
//! - **Branch record**: one raw entry from the lookup service, tagged MAIN or BRANCH
//! - **Enriched record**: a seed extended with registry fields, the unit that is persisted
//! - **Date zone**: the explicit zone used to turn epoch timestamps into calendar dates
//!
//! ## Mapping
//!
//! Branch records are folded into an accumulator one at a time:
//!
//! ```
//! use compass_domain::{fold_branch, BranchRecord, DateZone, EnrichedRecord, SeedRecord};
//!
//! let seed = SeedRecord::new("uuid-1", "7707083893", None, "2024-01-01 00:00:00", false);
//! let branch: BranchRecord = serde_json::from_value(serde_json::json!({
//!     "data": {
//!         "branch_type": "MAIN",
//!         "opf": {"short": "ПАО"},
//!         "name": {"full": "Сбербанк России"},
//!         "state": {"status": "ACTIVE", "registration_date": 677376000000u64}
//!     }
//! })).unwrap();
//!
//! let record = fold_branch(&EnrichedRecord::from_seed(seed), &branch, false, DateZone::Utc)
//!     .unwrap()
//!     .finalize();
//! assert_eq!(record.company_name(), Some("ПАО Сбербанк России"));
//! assert_eq!(record.seed.dadata_branch_name, None);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod branch;
pub mod enriched;
pub mod error;
pub mod mapper;
pub mod seed;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use branch::{BranchKind, BranchRecord, GeoCoordinate, LookupResponse};
pub use enriched::{CompanyProfile, EnrichedRecord, RegistrationDates};
pub use error::MappingError;
pub use mapper::{apply_branch, fold_branch, fold_raw};
pub use seed::SeedRecord;
pub use status::{extract_status, DateZone};
