//! Server shared state
//!
//! Holds configuration and the collaborators every handler needs.

use crate::config::Config;
use crate::error::Result;
use crate::geo::ip_location::IpLocator;
use crate::geo::nominatim::NominatimBackend;
use crate::geo::{get_geocoder, get_ip_locator};
use crate::store::LocationStore;
use std::time::Instant;

/// Shared state for the HTTP server
pub struct AppState {
    pub config: Config,

    /// Where the selected location lives
    pub store: LocationStore,

    pub geocoder: NominatimBackend,

    /// Answers `/api/geolocate`
    pub locator: IpLocator,

    started: Instant,
}

impl AppState {
    /// State with the configured geocoder and the default IP locator
    pub fn new(config: Config, store: LocationStore) -> Result<Self> {
        let geocoder = get_geocoder(&config)?;
        Ok(Self::with_backends(config, store, geocoder, get_ip_locator()))
    }

    /// State with explicit collaborators
    pub fn with_backends(
        config: Config,
        store: LocationStore,
        geocoder: NominatimBackend,
        locator: IpLocator,
    ) -> Self {
        Self {
            config,
            store,
            geocoder,
            locator,
            started: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
