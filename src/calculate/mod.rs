//! Solar savings calculation
//!
//! Validates the roof/panel form and turns it into a yearly energy estimate
//! for the selected location.

pub mod estimate;
pub mod form;

pub use estimate::{Estimate, MonthlyEnergy};
pub use form::{CalculateForm, CalculationInput, FieldErrors, PvTechnology};

use crate::config::CalculateConfig;
use crate::store::SelectedLocation;

/// Validate a form and estimate output at the selected location
///
/// Any field problem, including an unusable roof area, comes back as
/// `FieldErrors`.
pub fn calculate(
    form: &CalculateForm,
    location: &SelectedLocation,
    year: i32,
    params: &CalculateConfig,
) -> Result<Estimate, FieldErrors> {
    let input = form.validate()?;
    estimate::estimate(&input, location.coords(), year, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;

    #[test]
    fn test_calculate_end_to_end() {
        let form = CalculateForm {
            roof_area: Some("25".to_string()),
            pv_technology: Some("polycrystalline".to_string()),
            azimuth: Some("0".to_string()),
            mounting_slope: Some("35".to_string()),
        };
        let location = SelectedLocation::new("Lyon", Coordinates::new(45.764, 4.8357)).unwrap();

        let estimate = calculate(&form, &location, 2023, &CalculateConfig::default()).unwrap();
        assert_eq!(estimate.technology, PvTechnology::Polycrystalline);
        assert!(estimate.annual_kwh > 0.0);
        // Summer beats winter in the northern hemisphere
        assert!(estimate.months[5].daylight_hours > estimate.months[11].daylight_hours);
    }

    #[test]
    fn test_calculate_reports_form_errors() {
        let location = SelectedLocation::new("Lyon", Coordinates::new(45.764, 4.8357)).unwrap();
        let errors =
            calculate(&CalculateForm::default(), &location, 2023, &CalculateConfig::default())
                .unwrap_err();
        assert!(!errors.is_empty());
    }
}
