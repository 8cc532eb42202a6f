//! Geocoding module
//!
//! Provides geocoding (free text to ranked candidates), reverse geocoding and
//! IP geolocation.

pub mod ip_location;
pub mod nominatim;

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// One geocoding result
///
/// Immutable once received; a search replaces the whole list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display label (address or description)
    pub label: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

impl Candidate {
    /// Create a candidate
    pub fn new(label: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            label: label.into(),
            lat,
            lng,
        }
    }

    /// The candidate's position
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Search for candidates matching a free-text query
    ///
    /// Results are in provider relevance order; no match is an empty list.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Candidate>>> + Send;

    /// Reverse geocode coordinates to a location name
    fn reverse_geocode(&self, at: Coordinates) -> impl Future<Output = Result<Option<Candidate>>> + Send;

    /// Best match for the query, or None if not found
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Option<Candidate>>> + Send {
        async move { Ok(self.search(query).await?.into_iter().next()) }
    }
}

/// Build the configured geocoding backend
pub fn get_geocoder(config: &Config) -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::from_config(config)
}

/// Get the IP location service
pub fn get_ip_locator() -> ip_location::IpLocator {
    ip_location::IpLocator::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackend(Vec<Candidate>);

    impl GeoBackend for FixedBackend {
        async fn search(&self, _query: &str) -> Result<Vec<Candidate>> {
            Ok(self.0.clone())
        }

        async fn reverse_geocode(&self, _at: Coordinates) -> Result<Option<Candidate>> {
            Ok(None)
        }
    }

    #[test]
    fn test_candidate_serialization() {
        let candidate = Candidate::new("Paris, France", 48.8566, 2.3522);

        let json = serde_json::to_string(&candidate).unwrap();
        let parsed: Candidate = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, candidate);
        assert_eq!(parsed.coords(), Coordinates::new(48.8566, 2.3522));
    }

    #[tokio::test]
    async fn test_geocode_takes_top_result() {
        let backend = FixedBackend(vec![
            Candidate::new("Paris, France", 48.8566, 2.3522),
            Candidate::new("Paris, Texas", 33.6609, -95.5555),
        ]);

        let best = backend.geocode("paris").await.unwrap().unwrap();
        assert_eq!(best.label, "Paris, France");

        let empty = FixedBackend(Vec::new());
        assert!(empty.geocode("nowhere").await.unwrap().is_none());
    }
}
