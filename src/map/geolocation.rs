//! Device geolocation
//!
//! One-shot "where am I" requests. Failures carry a human-readable message
//! that the map shows as-is.

use crate::coord::Coordinates;
use crate::geo::ip_location::IpLocator;
use std::future::Future;
use thiserror::Error;

/// Shown when the host has no geolocation capability at all
pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported on this platform.";

/// Why a position could not be obtained
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("{}", UNSUPPORTED_MESSAGE)]
    Unsupported,

    /// Denied, unavailable or timed out; the message comes from the provider
    #[error("{0}")]
    Failed(String),
}

/// A source of the device's current position
pub trait Geolocator: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

impl Geolocator for IpLocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.locate()
            .await
            .map(|candidate| candidate.coords())
            .map_err(|e| GeolocationError::Failed(e.to_string()))
    }
}
