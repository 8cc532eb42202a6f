//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for geocoding.
//! Rate limit: 1 request per second, and a User-Agent is mandatory.

use crate::config::Config;
use crate::constants::api::{NOMINATIM_URL, USER_AGENT};
use crate::coord::Coordinates;
use crate::config::defaults::DEFAULT_RESULT_LIMIT;
use crate::error::{Error, Result};
use crate::geo::{Candidate, GeoBackend};
use serde::Deserialize;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Reverse lookups that miss return `{"error": "..."}` with status 200
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    Found(NominatimResult),
    Missing { error: String },
}

impl NominatimBackend {
    /// Create a backend against the public Nominatim instance
    pub fn new() -> Result<Self> {
        Self::with_base_url(NOMINATIM_URL, USER_AGENT, DEFAULT_RESULT_LIMIT)
    }

    /// Create a backend against any Nominatim-compatible server
    pub fn with_base_url(base_url: &str, user_agent: &str, limit: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Geocoding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limit: limit.max(1),
        })
    }

    /// Create a backend from the `[geocoder]` and `[search]` config sections
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_base_url(
            &config.geocoder.base_url,
            &config.geocoder.user_agent,
            config.search.result_limit,
        )
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat.parse().map_err(|_| {
            Error::Geocoding(format!("Invalid latitude: {}", lat))
        })?;
        let lng: f64 = lng.parse().map_err(|_| {
            Error::Geocoding(format!("Invalid longitude: {}", lng))
        })?;
        Ok((lat, lng))
    }

    fn into_candidate(result: NominatimResult) -> Result<Candidate> {
        let (lat, lng) = Self::parse_coords(&result.lat, &result.lon)?;
        Ok(Candidate::new(result.display_name, lat, lng))
    }
}

impl GeoBackend for NominatimBackend {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        let url = format!(
            "{}/search?q={}&format=json&limit={}",
            self.base_url,
            urlencoding::encode(query),
            self.limit
        );

        debug!(query, "Nominatim search");

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        results.into_iter().map(Self::into_candidate).collect()
    }

    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<Candidate>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url, at.lat, at.lng
        );

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: ReverseResponse = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        match result {
            ReverseResponse::Found(found) => Ok(Some(Self::into_candidate(found)?)),
            ReverseResponse::Missing { error } => {
                debug!(%at, error, "Nominatim reverse lookup found nothing");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coords() {
        let (lat, lng) = NominatimBackend::parse_coords("48.8566", "2.3522").unwrap();
        assert!((lat - 48.8566).abs() < 0.0001);
        assert!((lng - 2.3522).abs() < 0.0001);
    }

    #[test]
    fn test_parse_coords_invalid() {
        assert!(NominatimBackend::parse_coords("invalid", "0").is_err());
        assert!(NominatimBackend::parse_coords("0", "invalid").is_err());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.geocoder.base_url = "http://localhost:8080/".to_string();
        config.search.result_limit = 3;

        let backend = NominatimBackend::from_config(&config).unwrap();
        assert_eq!(backend.base_url, "http://localhost:8080");
        assert_eq!(backend.limit, 3);
    }

    #[test]
    fn test_reverse_response_variants() {
        let found: ReverseResponse = serde_json::from_str(
            r#"{"lat": "51.5", "lon": "-0.12", "display_name": "Westminster"}"#,
        )
        .unwrap();
        assert!(matches!(found, ReverseResponse::Found(_)));

        let missing: ReverseResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(matches!(missing, ReverseResponse::Missing { .. }));
    }
}
