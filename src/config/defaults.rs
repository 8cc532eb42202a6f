//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Quiet interval before a typed query is sent to the geocoder
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Maximum number of candidates requested per search
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Map fallback latitude when no location has been selected yet
pub const DEFAULT_MAP_LAT: f64 = 51.505;

/// Map fallback longitude when no location has been selected yet
pub const DEFAULT_MAP_LNG: f64 = -0.09;

/// Initial map zoom
pub const DEFAULT_ZOOM: u8 = 15;

/// Route signalled after a location is committed
pub const DEFAULT_NEXT_ROUTE: &str = "/calculate";

/// Mean surface irradiance used by the estimate, in W/m²
pub const DEFAULT_IRRADIANCE_W_M2: f64 = 365.0;

/// Share of daylight counted as peak sun hours
pub const DEFAULT_PEAK_FACTOR: f64 = 0.6;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "solarscope";
