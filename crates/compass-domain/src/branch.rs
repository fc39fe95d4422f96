//! Raw branch records as returned by the lookup service
//!
//! Every nested object is optional: the upstream shape varies from company to
//! company, and a missing object simply resolves to `None` at mapping time.
//! Only `data` is required; a record without it cannot be mapped at all.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of a branch record by its `branch_type` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    /// Primary registered entity (also used when the tag is missing or empty)
    Main,

    /// Subordinate registered branch
    Branch,

    /// Any other tag; contributes nothing but the cache flag
    Other,
}

impl BranchKind {
    /// Classify a raw `branch_type` value
    pub fn classify(branch_type: Option<&str>) -> Self {
        match branch_type {
            None | Some("") | Some("MAIN") => BranchKind::Main,
            Some("BRANCH") => BranchKind::Branch,
            Some(_) => BranchKind::Other,
        }
    }
}

/// One entry of the lookup service's branch list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Display value of the entry (used as the branch name)
    #[serde(default)]
    pub value: Option<String>,

    /// Registry payload
    pub data: CompanyData,
}

impl BranchRecord {
    /// Classification of this record
    pub fn kind(&self) -> BranchKind {
        BranchKind::classify(self.data.branch_type.as_deref())
    }

    /// Whether the record is explicitly tagged `MAIN`
    ///
    /// Untagged records map like MAIN but carry no status.
    pub fn is_tagged_main(&self) -> bool {
        self.data.branch_type.as_deref() == Some("MAIN")
    }
}

/// Registry payload of a branch record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyData {
    /// Company name variants
    pub name: Option<CompanyName>,

    /// Legal form
    pub opf: Option<LegalForm>,

    /// OKPO code
    pub okpo: Option<String>,

    /// Main OKVED activity code
    pub okved: Option<String>,

    /// KPP of this particular branch
    pub kpp: Option<String>,

    /// `MAIN`, `BRANCH` or absent
    pub branch_type: Option<String>,

    /// Registered address
    pub address: Option<Address>,

    /// Registration state
    pub state: Option<CompanyState>,
}

/// Name block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyName {
    /// Full registered name
    pub full: Option<String>,
}

/// Legal form block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalForm {
    /// Abbreviated legal form
    pub short: Option<String>,
}

/// Address block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Address as a single free-form line
    pub unrestricted_value: Option<String>,

    /// Structured address parts
    pub data: Option<AddressData>,
}

/// Structured address parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressData {
    /// Region including its type
    pub region_with_type: Option<String>,

    /// Federal district
    pub federal_district: Option<String>,

    /// City
    pub city: Option<String>,

    /// Latitude
    pub geo_lat: Option<GeoCoordinate>,

    /// Longitude
    pub geo_lon: Option<GeoCoordinate>,
}

/// A coordinate kept in whichever form the service sent it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoCoordinate {
    /// Numeric coordinate, integer or float as received
    Number(serde_json::Number),

    /// Coordinate sent as a string
    Text(String),
}

/// Registration state block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyState {
    /// Registry status (e.g. `ACTIVE`, `LIQUIDATED`)
    pub status: Option<String>,

    /// Registration instant, epoch milliseconds
    pub registration_date: Option<i64>,

    /// Liquidation instant, epoch milliseconds
    pub liquidation_date: Option<i64>,
}

/// Response of the lookup service: `[branches, from_cache]`
///
/// Branches stay as raw JSON values so that one malformed entry can be skipped
/// without losing the rest of the list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(Vec<Value>, bool)", into = "(Vec<Value>, bool)")]
pub struct LookupResponse {
    /// Raw branch records in upstream order
    pub branches: Vec<Value>,

    /// Whether the service answered from its cache
    pub from_cache: bool,
}

impl LookupResponse {
    /// Create a response from raw branch values
    pub fn new(branches: Vec<Value>, from_cache: bool) -> Self {
        Self { branches, from_cache }
    }
}

impl From<(Vec<Value>, bool)> for LookupResponse {
    fn from((branches, from_cache): (Vec<Value>, bool)) -> Self {
        Self { branches, from_cache }
    }
}

impl From<LookupResponse> for (Vec<Value>, bool) {
    fn from(response: LookupResponse) -> Self {
        (response.branches, response.from_cache)
    }
}
