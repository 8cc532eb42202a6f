//! Calculation form validation
//!
//! Field-level checks with one list of messages per field, so a client can
//! show every problem inline at once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const ROOF_AREA: &str = "roofArea";
pub const PV_TECHNOLOGY: &str = "pvTechnology";
pub const AZIMUTH: &str = "azimuth";
pub const MOUNTING_SLOPE: &str = "mountingSlope";

/// Photovoltaic panel technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PvTechnology {
    Monocrystalline,
    Polycrystalline,
    ThinFilm,
}

impl PvTechnology {
    /// Typical module efficiency
    pub fn efficiency(&self) -> f64 {
        match self {
            Self::Monocrystalline => 0.223,
            Self::Polycrystalline => 0.18,
            Self::ThinFilm => 0.12,
        }
    }

    pub fn all() -> [PvTechnology; 3] {
        [Self::Monocrystalline, Self::Polycrystalline, Self::ThinFilm]
    }
}

impl fmt::Display for PvTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monocrystalline => write!(f, "monocrystalline"),
            Self::Polycrystalline => write!(f, "polycrystalline"),
            Self::ThinFilm => write!(f, "thinFilm"),
        }
    }
}

impl FromStr for PvTechnology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monocrystalline" => Ok(Self::Monocrystalline),
            "polycrystalline" => Ok(Self::Polycrystalline),
            "thinFilm" | "thin-film" | "thin_film" => Ok(Self::ThinFilm),
            _ => Err(format!("Unknown PV technology: {}", s)),
        }
    }
}

/// Raw form submission; every field may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateForm {
    #[serde(default)]
    pub roof_area: Option<String>,
    #[serde(default)]
    pub pv_technology: Option<String>,
    #[serde(default)]
    pub azimuth: Option<String>,
    #[serde(default)]
    pub mounting_slope: Option<String>,
}

/// A form that passed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    pub roof_area: String,
    pub pv_technology: PvTechnology,
    pub azimuth: String,
    pub mounting_slope: String,
}

/// Field name to its validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl CalculateForm {
    /// Check every field, collecting all failures
    pub fn validate(&self) -> Result<CalculationInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let roof_area = match self.roof_area.as_deref().map(str::trim) {
            Some(area) if !area.is_empty() => Some(area.to_string()),
            _ => {
                errors.add(ROOF_AREA, "Roof area is required");
                None
            }
        };

        let pv_technology = match self.pv_technology.as_deref().map(str::parse::<PvTechnology>) {
            Some(Ok(technology)) => Some(technology),
            _ => {
                errors.add(PV_TECHNOLOGY, "PV technology is required");
                None
            }
        };

        if self.azimuth.is_none() {
            errors.add(AZIMUTH, "Required");
        }
        if self.mounting_slope.is_none() {
            errors.add(MOUNTING_SLOPE, "Required");
        }

        match (roof_area, pv_technology, &self.azimuth, &self.mounting_slope) {
            (Some(roof_area), Some(pv_technology), Some(azimuth), Some(mounting_slope))
                if errors.is_empty() =>
            {
                Ok(CalculationInput {
                    roof_area,
                    pv_technology,
                    azimuth: azimuth.clone(),
                    mounting_slope: mounting_slope.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> CalculateForm {
        CalculateForm {
            roof_area: Some("42".to_string()),
            pv_technology: Some("monocrystalline".to_string()),
            azimuth: Some("0".to_string()),
            mounting_slope: Some("30".to_string()),
        }
    }

    #[test]
    fn test_valid_form() {
        let input = complete_form().validate().unwrap();
        assert_eq!(input.roof_area, "42");
        assert_eq!(input.pv_technology, PvTechnology::Monocrystalline);
    }

    #[test]
    fn test_empty_optional_text_is_allowed() {
        let form = CalculateForm {
            azimuth: Some(String::new()),
            mounting_slope: Some(String::new()),
            ..complete_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = CalculateForm::default().validate().unwrap_err();

        assert_eq!(errors.get(ROOF_AREA), Some(&["Roof area is required".to_string()][..]));
        assert_eq!(
            errors.get(PV_TECHNOLOGY),
            Some(&["PV technology is required".to_string()][..])
        );
        assert_eq!(errors.get(AZIMUTH), Some(&["Required".to_string()][..]));
        assert_eq!(errors.get(MOUNTING_SLOPE), Some(&["Required".to_string()][..]));
    }

    #[test]
    fn test_blank_roof_area_and_unknown_technology() {
        let form = CalculateForm {
            roof_area: Some("  ".to_string()),
            pv_technology: Some("perovskite".to_string()),
            ..complete_form()
        };
        let errors = form.validate().unwrap_err();

        assert!(errors.get(ROOF_AREA).is_some());
        assert!(errors.get(PV_TECHNOLOGY).is_some());
        assert!(errors.get(AZIMUTH).is_none());
    }

    #[test]
    fn test_form_json_field_names() {
        let form: CalculateForm = serde_json::from_str(
            r#"{"roofArea": "20", "pvTechnology": "thinFilm", "azimuth": "10", "mountingSlope": "5"}"#,
        )
        .unwrap();
        assert_eq!(form.validate().unwrap().pv_technology, PvTechnology::ThinFilm);
    }

    #[test]
    fn test_field_errors_json_shape() {
        let errors = CalculateForm::default().validate().unwrap_err();
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["roofArea"][0], "Roof area is required");
    }

    #[test]
    fn test_technology_round_trip_names() {
        for technology in PvTechnology::all() {
            assert_eq!(technology.to_string().parse::<PvTechnology>().unwrap(), technology);
        }
    }
}
