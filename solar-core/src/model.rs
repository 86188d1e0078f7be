use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

use crate::error::QueryError;

/// Unit suffix for both irradiance metrics.
pub const IRRADIANCE_UNIT: &str = "kWh/m²/day";

/// Raw form input. Values are kept as typed and never parsed as numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolarQuery {
    pub latitude: String,
    pub longitude: String,
    pub credential: String,
}

impl SolarQuery {
    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self { latitude: latitude.into(), longitude: longitude.into(), credential: credential.into() }
    }

    /// Presence check only: blank or whitespace-only values count as missing.
    pub fn validate(&self, revision: Revision) -> Result<(), QueryError> {
        let coords_missing = is_blank(&self.latitude) || is_blank(&self.longitude);

        if revision.collects_credential() {
            if coords_missing || is_blank(&self.credential) {
                return Err(QueryError::MissingCoordinatesOrKey);
            }
        } else if coords_missing {
            return Err(QueryError::MissingCoordinates);
        }

        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Annual averages extracted from one successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarResult {
    pub dni_kwh_m2_day: f64,
    pub ghi_kwh_m2_day: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

impl SolarResult {
    pub fn dni_display(&self) -> String {
        format_irradiance(Some(self.dni_kwh_m2_day))
    }

    pub fn ghi_display(&self) -> String {
        format_irradiance(self.ghi_kwh_m2_day)
    }
}

/// Two decimals plus unit, or `n/a` when the value is missing.
pub fn format_irradiance(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2} {IRRADIANCE_UNIT}"),
        None => "n/a".to_string(),
    }
}

/// Which variant of the form is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Revision {
    /// Configured key, DNI only.
    DniOnly,
    /// Configured key, DNI and GHI.
    DniGhi,
    /// Key typed into the form, DNI and GHI.
    #[default]
    UserCredential,
}

impl Revision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Revision::DniOnly => "dni-only",
            Revision::DniGhi => "dni-ghi",
            Revision::UserCredential => "user-credential",
        }
    }

    pub const fn all() -> &'static [Revision] {
        &[Revision::DniOnly, Revision::DniGhi, Revision::UserCredential]
    }

    pub fn collects_credential(&self) -> bool {
        matches!(self, Revision::UserCredential)
    }

    pub fn reads_ghi(&self) -> bool {
        !matches!(self, Revision::DniOnly)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Revision {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "dni-only" => Ok(Revision::DniOnly),
            "dni-ghi" => Ok(Revision::DniGhi),
            "user-credential" => Ok(Revision::UserCredential),
            _ => Err(anyhow::anyhow!(
                "Unknown revision '{value}'. Supported revisions: dni-only, dni-ghi, user-credential."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_as_str_roundtrip() {
        for rev in Revision::all() {
            let parsed = Revision::try_from(rev.as_str()).expect("roundtrip should succeed");
            assert_eq!(*rev, parsed);
        }
        assert_eq!(Revision::try_from("DNI-GHI").unwrap(), Revision::DniGhi);
    }

    #[test]
    fn unknown_revision_error() {
        let err = Revision::try_from("v4").unwrap_err();
        assert!(err.to_string().contains("Unknown revision"));
    }

    #[test]
    fn blank_inputs_are_missing() {
        let blanks = ["", " ", "\t", "  \n "];
        for blank in blanks {
            let q = SolarQuery::new(blank, "-105.0", "KEY");
            assert_eq!(q.validate(Revision::DniGhi), Err(QueryError::MissingCoordinates));

            let q = SolarQuery::new("40.0", blank, "KEY");
            assert_eq!(q.validate(Revision::DniOnly), Err(QueryError::MissingCoordinates));

            let q = SolarQuery::new("40.0", "-105.0", blank);
            assert_eq!(
                q.validate(Revision::UserCredential),
                Err(QueryError::MissingCoordinatesOrKey)
            );
        }
    }

    #[test]
    fn credential_only_checked_when_collected() {
        let q = SolarQuery::new("40.0", "-105.0", "");
        assert!(q.validate(Revision::DniGhi).is_ok());
        assert!(q.validate(Revision::UserCredential).is_err());
    }

    #[test]
    fn values_are_not_parsed() {
        let q = SolarQuery::new("north", "west", "KEY");
        assert!(q.validate(Revision::UserCredential).is_ok());
    }

    #[test]
    fn formats_two_decimals_with_unit() {
        assert_eq!(format_irradiance(Some(5.123)), "5.12 kWh/m²/day");
        assert_eq!(format_irradiance(Some(3.456)), "3.46 kWh/m²/day");
        assert_eq!(format_irradiance(Some(0.0)), "0.00 kWh/m²/day");
        assert_eq!(format_irradiance(None), "n/a");
    }
}
