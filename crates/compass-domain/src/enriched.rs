//! Enriched records - the unit written to disk

use crate::branch::GeoCoordinate;
use crate::seed::SeedRecord;
use serde::Serialize;

/// A seed extended with registry data
///
/// The two optional blocks are flattened into the output document and are
/// left out entirely until something has populated them: `profile` after the
/// first mapped branch record, `dates` after the first MAIN status extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    /// Seed fields, including the branch accumulators
    #[serde(flatten)]
    pub seed: SeedRecord,

    /// Registration and liquidation dates from the MAIN record
    #[serde(flatten)]
    pub dates: Option<RegistrationDates>,

    /// Company fields from the MAIN record plus the cache flag
    #[serde(flatten)]
    pub profile: Option<CompanyProfile>,
}

impl EnrichedRecord {
    /// Start an accumulator from a seed
    pub fn from_seed(seed: SeedRecord) -> Self {
        Self {
            seed,
            dates: None,
            profile: None,
        }
    }

    /// Company name, if a MAIN record has been mapped
    pub fn company_name(&self) -> Option<&str> {
        self.profile.as_ref()?.company_name.as_deref()
    }

    /// Close the per-company pass: empty branch accumulators become `None`
    pub fn finalize(mut self) -> Self {
        self.seed.normalize_branches();
        self
    }
}

/// Fields derived from the MAIN record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyProfile {
    /// Legal form and full name, trimmed
    #[serde(rename = "dadata_company_name")]
    pub company_name: Option<String>,

    /// OKPO code
    #[serde(rename = "dadata_okpo")]
    pub okpo: Option<String>,

    /// Free-form registered address
    #[serde(rename = "dadata_address")]
    pub address: Option<String>,

    /// Region including its type
    #[serde(rename = "dadata_region")]
    pub region: Option<String>,

    /// Federal district
    #[serde(rename = "dadata_federal_district")]
    pub federal_district: Option<String>,

    /// City
    #[serde(rename = "dadata_city")]
    pub city: Option<String>,

    /// Main OKVED activity code
    #[serde(rename = "dadata_okved_activity_main_type")]
    pub okved_activity_main_type: Option<String>,

    /// Latitude
    #[serde(rename = "dadata_geo_lat")]
    pub geo_lat: Option<GeoCoordinate>,

    /// Longitude
    #[serde(rename = "dadata_geo_lon")]
    pub geo_lon: Option<GeoCoordinate>,

    /// Cache flag echoed by the lookup service on the last mapped record
    pub is_company_name_from_cache: bool,
}

/// Calendar dates derived from the MAIN record's state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationDates {
    /// `YYYY-MM-DD`
    #[serde(rename = "dadata_registration_date")]
    pub registration_date: Option<String>,

    /// `YYYY-MM-DD`
    #[serde(rename = "dadata_liquidation_date")]
    pub liquidation_date: Option<String>,
}
