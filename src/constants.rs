//! Centralized constants for the solarscope crate
//!
//! Values shared by more than one module live here so the geocoder, the
//! storage layer and the server agree on them.

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User agent sent to external services (Nominatim requires one)
    pub const USER_AGENT: &str = concat!("solarscope/", env!("CARGO_PKG_VERSION"));
}

/// Client-side storage
pub mod storage {
    /// Key of the persisted selected location record
    pub const LOCATION_KEY: &str = "user-location";

    /// Storage file name inside the data directory
    pub const STORAGE_FILE_NAME: &str = "storage.json";
}

/// Cache settings
pub mod cache {
    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}

/// Map limits
pub mod map {
    /// Most zoomed-out level
    pub const MIN_ZOOM: u8 = 0;

    /// Most zoomed-in level served by OpenStreetMap tiles
    pub const MAX_ZOOM: u8 = 19;
}
