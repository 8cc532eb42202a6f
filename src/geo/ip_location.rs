//! IP-based geolocation
//!
//! Uses ip-api.com for IP geolocation with file-based caching. This is the
//! "current location" capability on hosts without a positioning device.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_CACHE_FILE, IP_LOCATION_TTL_SECS};
use crate::config::defaults::APP_DIR_NAME;
use crate::error::{Error, Result};
use crate::geo::Candidate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// IP location service with caching
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    endpoint: String,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

/// Cached location data
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedLocation {
    location: Candidate,
    fetched_at: DateTime<Utc>,
}

impl IpLocator {
    /// Create a new IP locator with default cache path
    pub fn new() -> Self {
        let cache_path = dirs::cache_dir()
            .map(|p| p.join(APP_DIR_NAME).join(IP_LOCATION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            endpoint: IP_API_URL.to_string(),
            cache_path,
        }
    }

    /// Create an IP locator with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            cache_path: Some(cache_path),
            ..Self::new()
        }
    }

    /// Create an IP locator without caching
    pub fn without_cache() -> Self {
        Self {
            cache_path: None,
            ..Self::new()
        }
    }

    /// Point the locator at another ip-api compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Get current location based on IP address
    pub async fn locate(&self) -> Result<Candidate> {
        if let Some(cached) = self.load_cache() {
            debug!(label = %cached.label, "Using cached IP location");
            return Ok(cached);
        }

        let location = self.fetch_location().await?;
        self.save_cache(&location);

        Ok(location)
    }

    /// Fetch location from ip-api.com
    async fn fetch_location(&self) -> Result<Candidate> {
        let response = self.client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::Geolocation(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geolocation(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Geolocation(format!("Failed to parse IP location response: {}", e)))?;

        Self::into_candidate(data)
    }

    fn into_candidate(data: IpApiResponse) -> Result<Candidate> {
        if data.status != "success" {
            return Err(Error::Geolocation(match data.message {
                Some(message) => format!("IP location lookup failed: {}", message),
                None => "IP location lookup failed".to_string(),
            }));
        }

        let lat = data.lat.ok_or_else(|| Error::Geolocation("No latitude in response".to_string()))?;
        let lng = data.lon.ok_or_else(|| Error::Geolocation("No longitude in response".to_string()))?;

        let label = [data.city, data.region_name, data.country]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Candidate::new(
            if label.is_empty() { "Unknown Location".to_string() } else { label },
            lat,
            lng,
        ))
    }

    /// Load cached location if still fresh
    fn load_cache(&self) -> Option<Candidate> {
        let cache_path = self.cache_path.as_ref()?;
        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedLocation = serde_json::from_str(&content).ok()?;

        let age = Utc::now().signed_duration_since(cached.fetched_at);
        if age.num_seconds() >= 0 && (age.num_seconds() as u64) < IP_LOCATION_TTL_SECS {
            Some(cached.location)
        } else {
            None
        }
    }

    /// Save location to cache
    fn save_cache(&self, location: &Candidate) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let cached = CachedLocation {
            location: location.clone(),
            fetched_at: Utc::now(),
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            let _ = fs::write(cache_path, content);
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }

    /// Get cache duration
    pub fn cache_duration() -> Duration {
        Duration::from_secs(IP_LOCATION_TTL_SECS)
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ip_locator_without_cache() {
        let locator = IpLocator::without_cache();
        assert!(locator.cache_path.is_none());
        assert_eq!(locator.endpoint, IP_API_URL);
    }

    #[test]
    fn test_cache_operations() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("test_cache.json");
        let locator = IpLocator::with_cache_path(cache_path);

        assert!(locator.load_cache().is_none());

        let location = Candidate::new("Lyon, France", 45.764, 4.8357);
        locator.save_cache(&location);

        let loaded = locator.load_cache().unwrap();
        assert_eq!(loaded, location);

        locator.clear_cache();
        assert!(locator.load_cache().is_none());
    }

    #[test]
    fn test_stale_cache_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("stale.json");
        let stale = CachedLocation {
            location: Candidate::new("Lyon, France", 45.764, 4.8357),
            fetched_at: Utc::now() - chrono::Duration::hours(2),
        };
        fs::write(&cache_path, serde_json::to_string(&stale).unwrap()).unwrap();

        let locator = IpLocator::with_cache_path(cache_path);
        assert!(locator.load_cache().is_none());
    }

    #[test]
    fn test_cache_duration() {
        assert_eq!(IpLocator::cache_duration().as_secs(), 3600);
    }

    #[test]
    fn test_response_to_candidate() {
        let data: IpApiResponse = serde_json::from_str(
            r#"{"status": "success", "lat": 45.764, "lon": 4.8357, "city": "Lyon", "regionName": "Auvergne-Rhone-Alpes", "country": "France"}"#,
        )
        .unwrap();

        let candidate = IpLocator::into_candidate(data).unwrap();
        assert_eq!(candidate.label, "Lyon, Auvergne-Rhone-Alpes, France");
        assert_eq!(candidate.coords().lat, 45.764);
    }

    #[test]
    fn test_failed_response_keeps_message() {
        let data: IpApiResponse = serde_json::from_str(
            r#"{"status": "fail", "message": "private range"}"#,
        )
        .unwrap();

        let err = IpLocator::into_candidate(data).unwrap_err();
        assert!(err.to_string().contains("private range"));
    }
}
