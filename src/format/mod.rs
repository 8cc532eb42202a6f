//! Output formatters
//!
//! Renders a selected location for the terminal, for other tools (JSON, GPX)
//! or as a link into a web map.

pub mod gpx;
pub mod json;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::error::Result;
use crate::store::SelectedLocation;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    pub name: String,
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Render a location
    ///
    /// `zoom` is the map zoom the location was picked at; `config` supplies
    /// map URL templates.
    fn format(&self, location: &SelectedLocation, zoom: u8, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        "url" => Some(Box::new(url::UrlFormatter::default())),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    let formatters: [Box<dyn OutputFormatter>; 4] = [
        Box::new(text::TextFormatter),
        Box::new(json::JsonFormatter),
        Box::new(gpx::GpxFormatter),
        Box::new(url::UrlFormatter::default()),
    ];

    formatters
        .iter()
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_location() -> SelectedLocation {
    use crate::coord::Coordinates;
    SelectedLocation::new("Paris, Île-de-France, France", Coordinates::new(48.8566, 2.3522))
        .unwrap()
}
