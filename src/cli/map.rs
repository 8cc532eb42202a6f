//! Map command handler
//!
//! Mounts the map view on the stored location, applies the requested
//! interactions and prints where the map ended up. Nothing is saved unless
//! `--confirm` is given.
//!
//! Interactions apply in a fixed order: `--search`, `--here`, then each
//! `--click`, then each `--drag`.

use crate::cli::open_location_store;
use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::format::url::UrlFormatter;
use crate::format::{available_formats, get_formatter, OutputFormatter};
use crate::geo::{get_geocoder, get_ip_locator};
use crate::map::{MapEvent, MapView};
use crate::store::SelectedLocation;
use clap::Args;
use tracing::warn;

/// Map command arguments
#[derive(Args)]
pub struct MapArgs {
    /// Click the map at "lat,lng"
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub click: Vec<Coordinates>,

    /// Drop the marker at "lat,lng"
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub drag: Vec<Coordinates>,

    /// Use the map's search control
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Use current location
    #[arg(long)]
    pub here: bool,

    /// Zoom level (0-19)
    #[arg(long, short = 'z')]
    pub zoom: Option<u8>,

    /// Save the resulting position as the selected location
    #[arg(long)]
    pub confirm: bool,

    /// With --confirm, name an unlabeled position by reverse geocoding
    #[arg(long, requires = "confirm")]
    pub named: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the map command
pub async fn run(args: MapArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let store = open_location_store(&config)?;

    let stored = store.load().unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unreadable stored location");
        None
    });
    let mut view = MapView::mount(stored.as_ref(), &config.map);

    if let Some(zoom) = args.zoom {
        view.set_zoom(zoom);
    }

    if let Some(query) = &args.search {
        let geocoder = get_geocoder(&config)?;
        if !view.search_within(&geocoder, query).await? {
            eprintln!("No results for '{}'", query);
        }
    }

    if args.here {
        view.use_current_location(Some(&get_ip_locator())).await;
    }

    for at in args.click {
        view.apply(MapEvent::Click(at))?;
    }
    for at in args.drag {
        view.apply(MapEvent::MarkerDragEnd(at))?;
    }

    if let Some(message) = view.error() {
        eprintln!("{}", message);
    }

    let location = if args.confirm {
        let location = if args.named {
            view.confirm_named(&get_geocoder(&config)?).await?
        } else {
            view.confirm()?
        };
        store.save(&location)?;
        eprintln!("Saved location: {}", location.label);
        location
    } else {
        if !view.had_selection() {
            eprintln!("No location selected yet; showing the default position");
        }
        view.confirm()?
    };

    print_location(&location, view.zoom(), &args.format, args.provider, &config)
}

fn print_location(
    location: &SelectedLocation,
    zoom: u8,
    format: &str,
    provider: Option<String>,
    config: &Config,
) -> Result<()> {
    let formatter: Box<dyn OutputFormatter> = match provider {
        Some(provider) if format.eq_ignore_ascii_case("url") => {
            Box::new(UrlFormatter::with_provider(provider))
        }
        _ => get_formatter(format)
            .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?,
    };

    println!("{}", formatter.format(location, zoom, config)?.trim_end());
    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
