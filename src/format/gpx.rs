//! GPX output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::store::SelectedLocation;

/// Single-waypoint GPX document
pub struct GpxFormatter;

/// Escape the characters XML text content cannot carry raw
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, location: &SelectedLocation, _zoom: u8, _config: &Config) -> Result<String> {
        let name = escape_xml(&location.label);
        let at = location.coords();
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="solarscope">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <name>{}</name>\n", name));
        gpx.push_str(&format!("    <time>{}</time>\n", chrono::Utc::now().to_rfc3339()));
        gpx.push_str("  </metadata>\n");

        gpx.push_str(&format!(
            r#"  <wpt lat="{}" lon="{}">"#,
            at.lat, at.lng
        ));
        gpx.push('\n');
        gpx.push_str(&format!("    <name>{}</name>\n", name));
        gpx.push_str("    <sym>house</sym>\n");
        gpx.push_str("  </wpt>\n");

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::format::sample_location;

    #[test]
    fn test_gpx_format() {
        let output = GpxFormatter
            .format(&sample_location(), 15, &Config::default())
            .unwrap();

        assert!(output.starts_with(r#"<?xml version="1.0""#));
        assert!(output.contains(r#"<wpt lat="48.8566" lon="2.3522">"#));
        assert!(output.contains("<name>Paris, Île-de-France, France</name>"));
        assert!(output.trim_end().ends_with("</gpx>"));
    }

    #[test]
    fn test_gpx_escapes_label() {
        let location = SelectedLocation::new("Fish & Chips <Shop>", Coordinates::new(1.0, 2.0)).unwrap();
        let output = GpxFormatter.format(&location, 15, &Config::default()).unwrap();
        assert!(output.contains("Fish &amp; Chips &lt;Shop&gt;"));
    }
}
