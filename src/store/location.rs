//! The persisted "selected location" record
//!
//! Written by the search component on commit and by the map view on an
//! explicit confirm; read by the map view at mount.

use crate::constants::storage::LOCATION_KEY;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::Candidate;
use crate::store::BlobStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// The location chosen by the user
///
/// Serialized the way map search results are: `x` is the longitude and `y`
/// the latitude. `lat`/`lng` are accepted when reading.
///
/// The orientation is deliberate even though it reverses the usual
/// latitude-first pairing: it is the map library's point convention (x
/// east-west, y north-south) and the shape existing records already hold.
/// Do not swap `x` and `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedLocation {
    pub label: String,
    #[serde(rename = "x", alias = "lng")]
    lng: f64,
    #[serde(rename = "y", alias = "lat")]
    lat: f64,
}

impl SelectedLocation {
    /// Create a record; fails unless the coordinates are valid
    pub fn new(label: impl Into<String>, coords: Coordinates) -> Result<Self> {
        coords.validate()?;
        Ok(Self {
            label: label.into(),
            lng: coords.lng,
            lat: coords.lat,
        })
    }

    /// Record for a geocoding candidate
    pub fn from_candidate(candidate: &Candidate) -> Result<Self> {
        Self::new(candidate.label.clone(), candidate.coords())
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Typed access to the selected location in a [`BlobStore`]
#[derive(Clone)]
pub struct LocationStore {
    backend: Arc<dyn BlobStore>,
}

impl LocationStore {
    pub fn new(backend: Arc<dyn BlobStore>) -> Self {
        Self { backend }
    }

    /// Read the stored location, if one was ever saved
    ///
    /// A record that fails to parse or holds invalid coordinates is an error,
    /// not an absent value.
    pub fn load(&self) -> Result<Option<SelectedLocation>> {
        let Some(raw) = self.backend.get(LOCATION_KEY)? else {
            return Ok(None);
        };

        let location: SelectedLocation = serde_json::from_str(&raw).map_err(|e| {
            Error::Storage(format!("Stored location is unreadable: {}", e))
        })?;
        location.coords().validate()?;

        Ok(Some(location))
    }

    /// Persist a location, replacing any previous one
    pub fn save(&self, location: &SelectedLocation) -> Result<()> {
        let raw = serde_json::to_string(location)?;
        self.backend.set(LOCATION_KEY, &raw)?;
        info!(label = %location.label, at = %location.coords(), "Saved selected location");
        Ok(())
    }
}

impl std::fmt::Debug for LocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn memory_store() -> LocationStore {
        LocationStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_rejects_invalid_coordinates() {
        assert!(SelectedLocation::new("Nowhere", Coordinates::new(f64::NAN, 0.0)).is_err());
        assert!(SelectedLocation::new("Nowhere", Coordinates::new(0.0, 200.0)).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let location = SelectedLocation::new("Paris", Coordinates::new(48.8566, 2.3522)).unwrap();
        let value: serde_json::Value = serde_json::to_value(&location).unwrap();

        assert_eq!(value["label"], "Paris");
        assert_eq!(value["x"], 2.3522);
        assert_eq!(value["y"], 48.8566);
    }

    #[test]
    fn test_reads_lat_lng_aliases() {
        let location: SelectedLocation =
            serde_json::from_str(r#"{"label": "Paris", "lat": 48.8566, "lng": 2.3522}"#).unwrap();
        assert_eq!(location.coords(), Coordinates::new(48.8566, 2.3522));
    }

    #[test]
    fn test_missing_coordinates_rejected() {
        assert!(serde_json::from_str::<SelectedLocation>(r#"{"label": "Paris"}"#).is_err());
    }

    #[test]
    fn test_load_empty() {
        assert_eq!(memory_store().load().unwrap(), None);
    }

    #[test]
    fn test_save_overwrites() {
        let store = memory_store();
        let first = SelectedLocation::new("Paris", Coordinates::new(48.8566, 2.3522)).unwrap();
        let second = SelectedLocation::new("London", Coordinates::new(51.5, -0.12)).unwrap();

        store.save(&first).unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), Some(second));
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        let location = SelectedLocation::new(
            "10 Downing Street, London",
            Coordinates::new(51.503396, -0.127640),
        )
        .unwrap();

        LocationStore::new(Arc::new(FileStore::at(&path)))
            .save(&location)
            .unwrap();

        // A fresh store on the same file plays the part of the next mount
        let loaded = LocationStore::new(Arc::new(FileStore::at(&path)))
            .load()
            .unwrap()
            .unwrap();

        assert_eq!(loaded.label, location.label);
        assert_eq!(loaded.coords(), location.coords());
    }

    #[test]
    fn test_save_over_torn_storage_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        std::fs::write(&path, r#"{"user-location": "{\"label\":\"Par"#).unwrap();

        let store = LocationStore::new(Arc::new(FileStore::at(&path)));
        assert!(store.load().is_err());

        let london = SelectedLocation::new("London", Coordinates::new(51.5, -0.12)).unwrap();
        store.save(&london).unwrap();

        assert_eq!(store.load().unwrap(), Some(london));
    }

    #[test]
    fn test_load_corrupt_record() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(LOCATION_KEY, r#"{"label": "Bad", "x": 0.0, "y": 123.0}"#).unwrap();

        let store = LocationStore::new(backend);
        assert!(store.load().is_err());
    }
}
