//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::store::SelectedLocation;

pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, location: &SelectedLocation, zoom: u8, _config: &Config) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!("Location: {}\n", location.label));
        output.push_str(&format!("Coordinates: {}\n", location.coords()));
        output.push_str(&format!("Zoom: {}\n", zoom));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_location;

    #[test]
    fn test_text_format() {
        let output = TextFormatter
            .format(&sample_location(), 12, &Config::default())
            .unwrap();

        assert!(output.contains("Location: Paris"));
        assert!(output.contains("Coordinates: 48.856600, 2.352200"));
        assert!(output.contains("Zoom: 12"));
    }
}
