//! Map interaction component
//!
//! Holds the map position the user is refining. Clicks, marker drags, the
//! embedded search control and device geolocation all overwrite the
//! position; the viewport follows it without touching the zoom.
//!
//! Nothing here writes storage on its own. [`MapView::confirm`] is the
//! explicit save step.

pub mod geolocation;

use crate::config::MapConfig;
use crate::constants::map::{MAX_ZOOM, MIN_ZOOM};
use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::{Candidate, GeoBackend};
use crate::store::SelectedLocation;
use geolocation::{GeolocationError, Geolocator};
use serde::Serialize;
use tracing::{debug, warn};

/// What the map is showing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

/// Position-changing interactions
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The map was clicked at a coordinate
    Click(Coordinates),
    /// The marker was dropped at a coordinate
    MarkerDragEnd(Coordinates),
    /// The embedded search control picked a result
    SearchResult(Candidate),
}

/// Map interaction state
#[derive(Debug, Clone)]
pub struct MapView {
    position: Coordinates,
    zoom: u8,
    label: Option<String>,
    error: Option<String>,
    had_selection: bool,
}

impl MapView {
    /// Mount the view on the stored location, or the configured fallback
    pub fn mount(stored: Option<&SelectedLocation>, config: &MapConfig) -> Self {
        let zoom = config.zoom.clamp(MIN_ZOOM, MAX_ZOOM);

        match stored {
            Some(location) => Self {
                position: location.coords(),
                zoom,
                label: Some(location.label.clone()),
                error: None,
                had_selection: true,
            },
            None => {
                debug!("No stored location; using the default map position");
                Self {
                    position: config.default_position(),
                    zoom,
                    label: None,
                    error: None,
                    had_selection: false,
                }
            }
        }
    }

    pub fn position(&self) -> Coordinates {
        self.position
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Label of the current position, when it came from a named place
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Error slot (last geolocation failure)
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a stored selection existed at mount
    pub fn had_selection(&self) -> bool {
        self.had_selection
    }

    /// The view recentred on the current position at the current zoom
    pub fn viewport(&self) -> Viewport {
        Viewport {
            center: self.position,
            zoom: self.zoom,
        }
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Apply a click, drag or search result
    ///
    /// Click and drag longitudes are wrapped across the antimeridian. Invalid
    /// coordinates are rejected and the position is left alone.
    pub fn apply(&mut self, event: MapEvent) -> Result<()> {
        let (position, label) = match event {
            MapEvent::Click(at) | MapEvent::MarkerDragEnd(at) => (at.wrapped(), None),
            MapEvent::SearchResult(candidate) => (candidate.coords(), Some(candidate.label)),
        };
        position.validate()?;

        self.position = position;
        self.label = label;
        Ok(())
    }

    /// Embedded search control: move to the top result for `query`
    ///
    /// Returns whether anything was found.
    pub async fn search_within<G: GeoBackend>(&mut self, geocoder: &G, query: &str) -> Result<bool> {
        match geocoder.geocode(query).await? {
            Some(candidate) => {
                self.apply(MapEvent::SearchResult(candidate))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// "Use current location"
    ///
    /// `None` means the platform has no geolocation at all. Success moves
    /// the map and clears the error slot; failure fills the error slot and
    /// leaves the position unchanged.
    pub async fn use_current_location<L: Geolocator>(&mut self, locator: Option<&L>) {
        let outcome = match locator {
            Some(locator) => locator.current_position().await,
            None => Err(GeolocationError::Unsupported),
        };

        match outcome.and_then(|at| {
            at.validate()
                .map(|_| at)
                .map_err(|e| GeolocationError::Failed(e.to_string()))
        }) {
            Ok(at) => {
                self.position = at;
                self.label = None;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "Geolocation failed");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Explicit save: the current position as a location record
    ///
    /// Uses the label of the place the position came from, or the
    /// coordinates themselves after a click, drag or geolocation fix.
    pub fn confirm(&self) -> Result<SelectedLocation> {
        let label = self
            .label
            .clone()
            .unwrap_or_else(|| self.position.to_string());
        SelectedLocation::new(label, self.position)
    }

    /// Like [`confirm`](Self::confirm), but names an unnamed position by
    /// reverse geocoding it first
    pub async fn confirm_named<G: GeoBackend>(&self, geocoder: &G) -> Result<SelectedLocation> {
        if self.label.is_none() {
            match geocoder.reverse_geocode(self.position).await {
                Ok(Some(place)) => return SelectedLocation::new(place.label, self.position),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Reverse geocoding failed; using coordinates as label"),
            }
        }
        self.confirm()
    }
}
