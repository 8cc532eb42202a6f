//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/solarscope/config.toml

pub mod defaults;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Location search behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Geocoding service
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Map view settings
    #[serde(default)]
    pub map: MapConfig,

    /// Where to go after a location is chosen
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Energy estimate parameters
    #[serde(default)]
    pub calculate: CalculateConfig,

    /// Client-side storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Location search behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet interval in milliseconds before a query is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum candidates per search
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

/// Geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Nominatim-compatible base URL
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Map view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Fallback latitude when nothing has been selected
    #[serde(default = "default_map_lat")]
    pub default_lat: f64,

    /// Fallback longitude when nothing has been selected
    #[serde(default = "default_map_lng")]
    pub default_lng: f64,

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

/// Navigation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Route signalled after a location commit
    #[serde(default = "default_next_route")]
    pub next_route: String,
}

/// Energy estimate parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateConfig {
    /// Mean irradiance in W/m²
    #[serde(default = "default_irradiance")]
    pub irradiance_w_m2: f64,

    /// Share of daylight counted as peak hours
    #[serde(default = "default_peak_factor")]
    pub peak_factor: f64,
}

/// Client-side storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file override (defaults to the XDG data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_result_limit() -> usize {
    DEFAULT_RESULT_LIMIT
}
fn default_geocoder_url() -> String {
    crate::constants::api::NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    crate::constants::api::USER_AGENT.to_string()
}
fn default_map_lat() -> f64 {
    DEFAULT_MAP_LAT
}
fn default_map_lng() -> f64 {
    DEFAULT_MAP_LNG
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_next_route() -> String {
    DEFAULT_NEXT_ROUTE.to_string()
}
fn default_irradiance() -> f64 {
    DEFAULT_IRRADIANCE_W_M2
}
fn default_peak_factor() -> f64 {
    DEFAULT_PEAK_FACTOR
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},{zoom}z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={zoom}/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}&z={zoom}".to_string(),
    );
    providers
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            result_limit: default_result_limit(),
        }
    }
}

impl SearchConfig {
    /// Debounce interval as a `Duration`
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_lat: default_map_lat(),
            default_lng: default_map_lng(),
            zoom: default_zoom(),
        }
    }
}

impl MapConfig {
    /// Fallback map position
    pub fn default_position(&self) -> Coordinates {
        Coordinates::new(self.default_lat, self.default_lng)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            next_route: default_next_route(),
        }
    }
}

impl Default for CalculateConfig {
    fn default() -> Self {
        Self {
            irradiance_w_m2: default_irradiance(),
            peak_factor: default_peak_factor(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "result_limit"] => Some(self.search.result_limit.to_string()),

            ["geocoder", "base_url"] => Some(self.geocoder.base_url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),

            ["map", "default_lat"] => Some(self.map.default_lat.to_string()),
            ["map", "default_lng"] => Some(self.map.default_lng.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),

            ["navigation", "next_route"] => Some(self.navigation.next_route.clone()),

            ["calculate", "irradiance_w_m2"] => Some(self.calculate.irradiance_w_m2.to_string()),
            ["calculate", "peak_factor"] => Some(self.calculate.peak_factor.to_string()),

            ["storage", "path"] => Some(
                self.storage
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "debounce_ms"] => {
                self.search.debounce_ms = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid debounce value: {}", value))
                })?;
            }
            ["search", "result_limit"] => {
                let limit: usize = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid result limit: {}", value))
                })?;
                if limit == 0 {
                    return Err(Error::Config("Result limit must be at least 1".to_string()));
                }
                self.search.result_limit = limit;
            }

            ["geocoder", "base_url"] => {
                self.geocoder.base_url = value.trim_end_matches('/').to_string();
            }
            ["geocoder", "user_agent"] => {
                self.geocoder.user_agent = value.to_string();
            }

            ["map", "default_lat"] => {
                let lat: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid latitude value: {}", value))
                })?;
                Coordinates::new(lat, self.map.default_lng).validate()?;
                self.map.default_lat = lat;
            }
            ["map", "default_lng"] => {
                let lng: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid longitude value: {}", value))
                })?;
                Coordinates::new(self.map.default_lat, lng).validate()?;
                self.map.default_lng = lng;
            }
            ["map", "zoom"] => {
                let zoom: u8 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid zoom value: {}", value))
                })?;
                if zoom > crate::constants::map::MAX_ZOOM {
                    return Err(Error::Config(format!(
                        "Zoom {} exceeds maximum {}",
                        zoom,
                        crate::constants::map::MAX_ZOOM
                    )));
                }
                self.map.zoom = zoom;
            }

            ["navigation", "next_route"] => {
                self.navigation.next_route = value.to_string();
            }

            ["calculate", "irradiance_w_m2"] => {
                self.calculate.irradiance_w_m2 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid irradiance value: {}", value))
                })?;
            }
            ["calculate", "peak_factor"] => {
                let factor: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid peak factor: {}", value))
                })?;
                if !(0.0..=1.0).contains(&factor) {
                    return Err(Error::Config("Peak factor must be within [0, 1]".to_string()));
                }
                self.calculate.peak_factor = factor;
            }

            ["storage", "path"] => {
                self.storage.path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "search.debounce_ms",
            "search.result_limit",
            "geocoder.base_url",
            "geocoder.user_agent",
            "map.default_lat",
            "map.default_lng",
            "map.zoom",
            "navigation.next_route",
            "calculate.irradiance_w_m2",
            "calculate.peak_factor",
            "storage.path",
            "server.host",
            "server.port",
            "url.default",
        ]
    }

    /// Format a map URL using the specified provider
    ///
    /// Replaces {lat}, {lng} and {zoom} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, at: Coordinates, zoom: u8) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &at.lat.to_string())
            .replace("{lng}", &at.lng.to_string())
            .replace("{zoom}", &zoom.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn with_temp_config<F: FnOnce()>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        f();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.navigation.next_route, "/calculate");
        assert_eq!(config.map.zoom, 15);
        assert_eq!(config.server.port, 7878);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("navigation.next_route"), Some("/calculate".to_string()));

        config.set("navigation.next_route", "/calculator").unwrap();
        assert_eq!(config.get("navigation.next_route"), Some("/calculator".to_string()));

        config.set("search.debounce_ms", "500").unwrap();
        assert_eq!(config.search.debounce_ms, 500);

        config.set("storage.path", "/tmp/solar.json").unwrap();
        assert_eq!(config.get("storage.path"), Some("/tmp/solar.json".to_string()));
        config.set("storage.path", "").unwrap();
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("search.debounce_ms", "soon").is_err());
        assert!(config.set("search.result_limit", "0").is_err());
        assert!(config.set("map.default_lat", "95").is_err());
        assert!(config.set("map.zoom", "25").is_err());
        assert!(config.set("calculate.peak_factor", "1.5").is_err());
        assert_eq!(config.map.default_lat, DEFAULT_MAP_LAT);
    }

    #[test]
    fn test_format_url() {
        let config = Config::default();
        let at = Coordinates::new(51.5, -0.12);

        let url = config.format_url(Some("google"), at, 15).unwrap();
        assert_eq!(url, "https://www.google.com/maps/@51.5,-0.12,15z");

        let url = config.format_url(None, at, 12).unwrap();
        assert_eq!(
            url,
            "https://www.openstreetmap.org/?mlat=51.5&mlon=-0.12#map=12/51.5/-0.12"
        );
    }

    #[test]
    fn test_format_url_unknown_provider() {
        let config = Config::default();
        let result = config.format_url(Some("unknown"), Coordinates::new(0.0, 0.0), 3);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        with_temp_config(|| {
            let mut config = Config::default();
            config.navigation.next_route = "/calculator".to_string();
            config.search.result_limit = 8;
            config.save().unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.navigation.next_route, "/calculator");
            assert_eq!(loaded.search.result_limit, 8);
        });
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[map]\nzoom = 12\n").unwrap();
        assert_eq!(loaded.map.zoom, 12);
        assert_eq!(loaded.map.default_lat, DEFAULT_MAP_LAT);
        assert_eq!(loaded.search.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[search]"));
        assert!(toml.contains("[map]"));
        assert!(toml.contains("[navigation]"));
        assert!(toml.contains("[url.providers]"));
        assert!(!toml.contains("path ="));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7878");
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        let config = Config::default();
        for key in &keys {
            assert!(config.get(key).is_some(), "key {} has no getter", key);
        }
    }
}
