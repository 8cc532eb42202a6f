//! Solar energy estimate
//!
//! Monthly output of a roof installation from day length, a mean
//! irradiance and the panel efficiency:
//!
//! ```text
//! daylight  = acos(clamp(-tan(lat) * tan(decl), -1, 1)) * 24 / PI
//! daily kWh = irradiance * area * daylight * peak_factor / 1000 * efficiency
//! ```
//!
//! Solar declination uses Cooper's approximation.

use crate::calculate::form::{CalculationInput, FieldErrors, PvTechnology, ROOF_AREA};
use crate::config::CalculateConfig;
use crate::coord::Coordinates;
use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;
use std::f64::consts::PI;

/// Energy for one calendar month
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyEnergy {
    /// 1 = January
    pub month: u32,
    pub name: String,
    /// Mean day length over the month, in hours
    pub daylight_hours: f64,
    pub energy_kwh: f64,
}

/// Full-year estimate for one roof
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub location: Coordinates,
    pub roof_area_m2: f64,
    pub technology: PvTechnology,
    pub year: i32,
    pub months: Vec<MonthlyEnergy>,
    pub annual_kwh: f64,
}

/// Solar declination in degrees for a day of the year (1..=366)
pub fn solar_declination(day_of_year: u32) -> f64 {
    23.45 * (2.0 * PI * (284.0 + day_of_year as f64) / 365.0).sin()
}

/// Hours between sunrise and sunset at a latitude
pub fn daylight_hours(lat: f64, day_of_year: u32) -> f64 {
    let phi = lat.to_radians();
    let delta = solar_declination(day_of_year).to_radians();
    let cos_omega = (-phi.tan() * delta.tan()).clamp(-1.0, 1.0);
    cos_omega.acos() * 24.0 / PI
}

/// Every date of a month
fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect()
}

/// Mean day length over a calendar month
pub fn monthly_daylight_hours(lat: f64, year: i32, month: u32) -> f64 {
    let days = month_days(year, month);
    if days.is_empty() {
        return 0.0;
    }
    let total: f64 = days.iter().map(|d| daylight_hours(lat, d.ordinal())).sum();
    total / days.len() as f64
}

/// Parse the validated roof area as square metres
fn roof_area_m2(input: &CalculationInput) -> Result<f64, FieldErrors> {
    match input.roof_area.trim().parse::<f64>() {
        Ok(area) if area.is_finite() && area > 0.0 => Ok(area),
        _ => {
            let mut errors = FieldErrors::new();
            errors.add(ROOF_AREA, "Roof area must be a positive number");
            Err(errors)
        }
    }
}

/// Estimate a year of output for a validated form at a location
pub fn estimate(
    input: &CalculationInput,
    at: Coordinates,
    year: i32,
    params: &CalculateConfig,
) -> Result<Estimate, FieldErrors> {
    let area = roof_area_m2(input)?;
    let efficiency = input.pv_technology.efficiency();

    let months: Vec<MonthlyEnergy> = (1..=12u32)
        .map(|month| {
            let hours = monthly_daylight_hours(at.lat, year, month);
            let days = month_days(year, month).len() as f64;
            let daily_kwh =
                params.irradiance_w_m2 * area * hours * params.peak_factor / 1000.0 * efficiency;

            MonthlyEnergy {
                month,
                name: Month::try_from(month as u8)
                    .map(|m| m.name().to_string())
                    .unwrap_or_default(),
                daylight_hours: hours,
                energy_kwh: daily_kwh * days,
            }
        })
        .collect();

    let annual_kwh = months.iter().map(|m| m.energy_kwh).sum();

    Ok(Estimate {
        location: at,
        roof_area_m2: area,
        technology: input.pv_technology,
        year,
        months,
        annual_kwh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(area: &str, technology: PvTechnology) -> CalculationInput {
        CalculationInput {
            roof_area: area.to_string(),
            pv_technology: technology,
            azimuth: "0".to_string(),
            mounting_slope: "30".to_string(),
        }
    }

    #[test]
    fn test_equator_has_twelve_hour_days() {
        for day in [1, 80, 172, 266, 355] {
            assert_relative_eq!(daylight_hours(0.0, day), 12.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_polar_day_and_night() {
        assert_relative_eq!(daylight_hours(80.0, 172), 24.0, epsilon = 1e-9);
        assert_relative_eq!(daylight_hours(80.0, 355), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hemispheres_mirror() {
        let north = daylight_hours(45.0, 172);
        let south = daylight_hours(-45.0, 172);
        assert!(north > 15.0);
        assert_relative_eq!(north + south, 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_declination_at_solstice() {
        assert_relative_eq!(solar_declination(172), 23.45, epsilon = 0.05);
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(month_days(2023, 2).len(), 28);
        assert_eq!(month_days(2024, 2).len(), 29);
        assert_eq!(month_days(2023, 12).len(), 31);
        assert!(month_days(2023, 13).is_empty());
    }

    #[test]
    fn test_estimate_at_equator() {
        let estimate = estimate(
            &input("10", PvTechnology::Monocrystalline),
            Coordinates::new(0.0, 30.0),
            2023,
            &CalculateConfig::default(),
        )
        .unwrap();

        // 365 W/m² * 10 m² * 12 h * 0.6 / 1000 * 0.223
        let daily = 5.86044;
        assert_eq!(estimate.months.len(), 12);
        assert_eq!(estimate.months[0].name, "January");
        assert_relative_eq!(estimate.months[0].energy_kwh, daily * 31.0, epsilon = 1e-6);
        assert_relative_eq!(estimate.months[1].energy_kwh, daily * 28.0, epsilon = 1e-6);
        assert_relative_eq!(estimate.annual_kwh, daily * 365.0, epsilon = 1e-6);
    }

    #[test]
    fn test_technology_scales_output() {
        let at = Coordinates::new(48.8566, 2.3522);
        let params = CalculateConfig::default();
        let mono = estimate(&input("20", PvTechnology::Monocrystalline), at, 2023, &params).unwrap();
        let thin = estimate(&input("20", PvTechnology::ThinFilm), at, 2023, &params).unwrap();

        assert_relative_eq!(
            thin.annual_kwh / mono.annual_kwh,
            0.12 / 0.223,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_roof_area_must_be_positive_number() {
        let at = Coordinates::new(0.0, 0.0);
        let params = CalculateConfig::default();

        for bad in ["big", "-5", "0"] {
            let errors =
                estimate(&input(bad, PvTechnology::Polycrystalline), at, 2023, &params).unwrap_err();
            assert!(errors.get(ROOF_AREA).is_some(), "accepted {}", bad);
        }
    }
}
