//! Status extraction from the MAIN record

use crate::branch::BranchRecord;
use crate::enriched::{EnrichedRecord, RegistrationDates};
use crate::error::MappingError;
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for registry dates
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Zone used to turn epoch timestamps into calendar dates
///
/// Parsed from `utc`, `local` or a fixed offset such as `+03:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateZone {
    /// Coordinated Universal Time
    #[default]
    Utc,

    /// The host's zone at run time
    Local,

    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl DateZone {
    /// Format an epoch-millisecond instant as `YYYY-MM-DD` in this zone
    ///
    /// Zero and missing values have no date.
    pub fn format_millis(&self, millis: Option<i64>) -> Result<Option<String>, MappingError> {
        let millis = match millis {
            None | Some(0) => return Ok(None),
            Some(millis) => millis,
        };

        let instant = DateTime::<Utc>::from_timestamp(millis.div_euclid(1000), 0)
            .ok_or(MappingError::TimestampOutOfRange(millis))?;

        let formatted = match self {
            DateZone::Utc => instant.format(DATE_FORMAT).to_string(),
            DateZone::Local => instant.with_timezone(&Local).format(DATE_FORMAT).to_string(),
            DateZone::Fixed(offset) => instant.with_timezone(offset).format(DATE_FORMAT).to_string(),
        };
        Ok(Some(formatted))
    }
}

impl FromStr for DateZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "utc" | "z" => Ok(DateZone::Utc),
            "local" => Ok(DateZone::Local),
            other => FixedOffset::from_str(other)
                .map(DateZone::Fixed)
                .map_err(|e| format!("Invalid date zone '{}': {}", s, e)),
        }
    }
}

impl fmt::Display for DateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateZone::Utc => write!(f, "utc"),
            DateZone::Local => write!(f, "local"),
            DateZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl TryFrom<String> for DateZone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateZone> for String {
    fn from(zone: DateZone) -> Self {
        zone.to_string()
    }
}

/// Copy status and registration dates from a MAIN record
///
/// The record is left untouched when this fails.
pub fn extract_status(
    mut record: EnrichedRecord,
    main: &BranchRecord,
    zone: DateZone,
) -> Result<EnrichedRecord, MappingError> {
    let state = main.data.state.as_ref().ok_or(MappingError::MissingState)?;

    let dates = RegistrationDates {
        registration_date: zone.format_millis(state.registration_date)?,
        liquidation_date: zone.format_millis(state.liquidation_date)?,
    };

    record.seed.dadata_status = state.status.clone();
    record.dates = Some(dates);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::{CompanyData, CompanyState};
    use crate::seed::SeedRecord;

    fn record() -> EnrichedRecord {
        EnrichedRecord::from_seed(SeedRecord::new("u", "1", Some("OLD".into()), "t", false))
    }

    fn main_with_state(state: Option<CompanyState>) -> BranchRecord {
        BranchRecord {
            value: None,
            data: CompanyData {
                branch_type: Some("MAIN".into()),
                state,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_active_company() {
        let branch = main_with_state(Some(CompanyState {
            status: Some("active".into()),
            registration_date: Some(1633024800000),
            liquidation_date: None,
        }));

        let out = extract_status(record(), &branch, DateZone::Utc).unwrap();
        let dates = out.dates.unwrap();
        assert_eq!(out.seed.dadata_status.as_deref(), Some("active"));
        assert_eq!(dates.registration_date.as_deref(), Some("2021-09-30"));
        assert_eq!(dates.liquidation_date, None);
    }

    #[test]
    fn test_liquidated_company() {
        let branch = main_with_state(Some(CompanyState {
            status: Some("liquidated".into()),
            registration_date: None,
            liquidation_date: Some(1633024800000),
        }));

        let out = extract_status(record(), &branch, DateZone::Utc).unwrap();
        let dates = out.dates.unwrap();
        assert_eq!(out.seed.dadata_status.as_deref(), Some("liquidated"));
        assert_eq!(dates.registration_date, None);
        assert_eq!(dates.liquidation_date.as_deref(), Some("2021-09-30"));
    }

    #[test]
    fn test_midnight_boundary() {
        // 2021-10-01T00:00:00Z
        assert_eq!(
            DateZone::Utc.format_millis(Some(1633046400000)).unwrap().as_deref(),
            Some("2021-10-01")
        );
        let minus_three: DateZone = "-03:00".parse().unwrap();
        assert_eq!(
            minus_three.format_millis(Some(1633046400000)).unwrap().as_deref(),
            Some("2021-09-30")
        );
    }

    #[test]
    fn test_fixed_offset_moves_date() {
        // 2021-09-30T22:00:00Z is already October 1st in Moscow
        let moscow: DateZone = "+03:00".parse().unwrap();
        assert_eq!(
            moscow.format_millis(Some(1633039200000)).unwrap().as_deref(),
            Some("2021-10-01")
        );
    }

    #[test]
    fn test_zero_is_no_date() {
        assert_eq!(DateZone::Utc.format_millis(Some(0)).unwrap(), None);
        assert_eq!(DateZone::Utc.format_millis(None).unwrap(), None);
    }

    #[test]
    fn test_pre_epoch_floors() {
        // -1 ms is still 1969-12-31
        assert_eq!(
            DateZone::Utc.format_millis(Some(-1)).unwrap().as_deref(),
            Some("1969-12-31")
        );
    }

    #[test]
    fn test_out_of_range() {
        let err = DateZone::Utc.format_millis(Some(i64::MAX)).unwrap_err();
        assert_eq!(err, MappingError::TimestampOutOfRange(i64::MAX));
    }

    #[test]
    fn test_missing_state_is_an_error() {
        let err = extract_status(record(), &main_with_state(None), DateZone::Utc).unwrap_err();
        assert_eq!(err, MappingError::MissingState);
    }

    #[test]
    fn test_zone_parse_and_display() {
        assert_eq!("UTC".parse::<DateZone>().unwrap(), DateZone::Utc);
        assert_eq!("local".parse::<DateZone>().unwrap(), DateZone::Local);

        let fixed: DateZone = "+03:00".parse().unwrap();
        assert_eq!(fixed.to_string(), "+03:00");
        assert!("moscow".parse::<DateZone>().is_err());
    }
}
