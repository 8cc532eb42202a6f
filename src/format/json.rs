//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::store::SelectedLocation;
use serde::Serialize;

/// Pretty-printed location record plus the plain coordinates
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonLocation<'a> {
    label: &'a str,
    lat: f64,
    lng: f64,
    zoom: u8,
}

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Location as JSON"
    }

    fn format(&self, location: &SelectedLocation, zoom: u8, _config: &Config) -> Result<String> {
        let at = location.coords();
        let out = JsonLocation {
            label: &location.label,
            lat: at.lat,
            lng: at.lng,
            zoom,
        };
        Ok(serde_json::to_string_pretty(&out)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_location;

    #[test]
    fn test_json_format() {
        let output = JsonFormatter
            .format(&sample_location(), 15, &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["label"], "Paris, Île-de-France, France");
        assert_eq!(parsed["lat"], 48.8566);
        assert_eq!(parsed["lng"], 2.3522);
        assert_eq!(parsed["zoom"], 15);
    }
}
