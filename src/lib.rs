//! solarscope: pick a place, then estimate its rooftop solar output
//!
//! A library and CLI for selecting a geographic location (free-text search
//! or map interaction), persisting it, and estimating the yearly energy a
//! roof installation there would produce.
//!
//! ## Features
//!
//! - Debounced location search with keyboard selection and stale-response
//!   protection
//! - Map view driven by clicks, marker drags, search and geolocation
//! - Persisted selected location shared between the steps
//! - Monthly solar energy estimate with field-level form validation
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use solarscope::calculate::{calculate, CalculateForm};
//! use solarscope::config::CalculateConfig;
//! use solarscope::{Coordinates, SelectedLocation};
//!
//! let location = SelectedLocation::new("Lyon", Coordinates::new(45.764, 4.8357)).unwrap();
//! let form = CalculateForm {
//!     roof_area: Some("30".to_string()),
//!     pv_technology: Some("monocrystalline".to_string()),
//!     azimuth: Some("0".to_string()),
//!     mounting_slope: Some("35".to_string()),
//! };
//!
//! let estimate = calculate(&form, &location, 2024, &CalculateConfig::default()).unwrap();
//! println!("{:.0} kWh per year", estimate.annual_kwh);
//! ```

pub mod calculate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod map;
pub mod search;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use geo::{Candidate, GeoBackend};
pub use map::MapView;
pub use search::LocationSearch;
pub use store::{LocationStore, SelectedLocation};
