//! Geographic coordinates
//!
//! The value type shared by candidates, the persisted location and the map.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Same point with longitude wrapped into [-180, 180)
    ///
    /// Map renderers report longitudes past ±180 once the view is panned
    /// across the antimeridian. Latitude is left alone; non-finite values stay
    /// non-finite.
    pub fn wrapped(&self) -> Self {
        Self {
            lat: self.lat,
            lng: (self.lng + 180.0).rem_euclid(360.0) - 180.0,
        }
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(Error::InvalidCoordinates(format!(
                "({}, {}) is not a finite position",
                self.lat, self.lng
            )));
        }
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Parses `"lat,lng"` (whitespace around either number is allowed)
impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s.split_once(',').ok_or_else(|| {
            Error::InvalidCoordinates(format!("Expected \"lat,lng\", got \"{}\"", s))
        })?;
        let lat: f64 = lat.trim().parse().map_err(|_| {
            Error::InvalidCoordinates(format!("Invalid latitude: {}", lat.trim()))
        })?;
        let lng: f64 = lng.trim().parse().map_err(|_| {
            Error::InvalidCoordinates(format!("Invalid longitude: {}", lng.trim()))
        })?;

        let coords = Coordinates::new(lat, lng);
        coords.validate()?;
        Ok(coords)
    }
}
