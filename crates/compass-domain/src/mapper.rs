//! Field mapping - folding branch records into an enriched record
//!
//! MAIN records overwrite the company profile; BRANCH records append one line
//! each to the branch accumulators. Every call also stamps the cache flag, so
//! the flag always reflects the last record mapped.

use crate::branch::{BranchKind, BranchRecord, CompanyData};
use crate::enriched::{CompanyProfile, EnrichedRecord};
use crate::error::MappingError;
use crate::status::{extract_status, DateZone};
use serde::Deserialize;
use serde_json::Value;

/// Map one branch record into the accumulator
pub fn apply_branch(mut record: EnrichedRecord, branch: &BranchRecord, from_cache: bool) -> EnrichedRecord {
    let data = &branch.data;
    let profile = record.profile.get_or_insert_with(CompanyProfile::default);

    match branch.kind() {
        BranchKind::Main => {
            let address = data.address.as_ref();
            let parts = address.and_then(|a| a.data.as_ref());

            profile.company_name = Some(company_name(data));
            profile.okpo = data.okpo.clone();
            profile.address = address.and_then(|a| a.unrestricted_value.clone());
            profile.region = parts.and_then(|p| p.region_with_type.clone());
            profile.federal_district = parts.and_then(|p| p.federal_district.clone());
            profile.city = parts.and_then(|p| p.city.clone());
            profile.okved_activity_main_type = data.okved.clone();
            profile.geo_lat = parts.and_then(|p| p.geo_lat.clone());
            profile.geo_lon = parts.and_then(|p| p.geo_lon.clone());
        }
        BranchKind::Branch => {
            let address = data.address.as_ref();
            let region = address
                .and_then(|a| a.data.as_ref())
                .and_then(|p| p.region_with_type.as_deref());

            append_line(
                &mut record.seed.dadata_branch_name,
                &format!(
                    "{}, КПП {}",
                    branch.value.as_deref().unwrap_or_default(),
                    data.kpp.as_deref().unwrap_or_default()
                ),
            );
            append_line(
                &mut record.seed.dadata_branch_address,
                address.and_then(|a| a.unrestricted_value.as_deref()).unwrap_or_default(),
            );
            append_line(&mut record.seed.dadata_branch_region, region.unwrap_or_default());
        }
        BranchKind::Other => {}
    }

    profile.is_company_name_from_cache = from_cache;
    record
}

/// Fold one typed branch record: status first for a tagged MAIN, then the field mapping
///
/// On error the accumulator is unchanged.
pub fn fold_branch(
    acc: &EnrichedRecord,
    branch: &BranchRecord,
    from_cache: bool,
    zone: DateZone,
) -> Result<EnrichedRecord, MappingError> {
    let mut record = acc.clone();
    if branch.is_tagged_main() {
        record = extract_status(record, branch, zone)?;
    }
    Ok(apply_branch(record, branch, from_cache))
}

/// Fold one raw branch value as received from the lookup service
pub fn fold_raw(
    acc: &EnrichedRecord,
    raw: &Value,
    from_cache: bool,
    zone: DateZone,
) -> Result<EnrichedRecord, MappingError> {
    let branch = BranchRecord::deserialize(raw)?;
    fold_branch(acc, &branch, from_cache, zone)
}

fn company_name(data: &CompanyData) -> String {
    let short = data.opf.as_ref().and_then(|o| o.short.as_deref()).unwrap_or_default();
    let full = data.name.as_ref().and_then(|n| n.full.as_deref()).unwrap_or_default();
    format!("{} {}", short, full).trim().to_string()
}

fn append_line(field: &mut Option<String>, line: &str) {
    let buffer = field.get_or_insert_with(String::new);
    buffer.push_str(line);
    buffer.push('\n');
}
