//! Map link output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::store::SelectedLocation;

/// Map URL from the configured provider templates
#[derive(Debug, Default)]
pub struct UrlFormatter {
    /// Provider override; `None` uses `url.default`
    pub provider: Option<String>,
}

impl UrlFormatter {
    pub fn with_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
        }
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the location"
    }

    fn format(&self, location: &SelectedLocation, zoom: u8, config: &Config) -> Result<String> {
        config.format_url(self.provider.as_deref(), location.coords(), zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_location;

    #[test]
    fn test_url_default_provider() {
        let output = UrlFormatter::default()
            .format(&sample_location(), 15, &Config::default())
            .unwrap();

        assert!(output.contains("openstreetmap.org"));
        assert!(output.contains("48.8566"));
        assert!(output.contains("15"));
    }

    #[test]
    fn test_url_with_provider() {
        let output = UrlFormatter::with_provider("google")
            .format(&sample_location(), 15, &Config::default())
            .unwrap();
        assert!(output.contains("google.com/maps"));
    }

    #[test]
    fn test_url_unknown_provider() {
        let result = UrlFormatter::with_provider("mapquest").format(
            &sample_location(),
            15,
            &Config::default(),
        );
        assert!(result.is_err());
    }
}
