//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "search.debounce_ms")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key.as_deref(), args.value.as_deref()) {
        (None, None) => show_all_config(&config),

        (Some(key), None) => {
            let value = config.get(key).ok_or_else(|| unknown_key(key))?;
            println!("{}", value);
        }

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {} (available: {})",
        key,
        Config::available_keys().join(", ")
    ))
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[search]");
    println!("debounce_ms = {}", config.search.debounce_ms);
    println!("result_limit = {}", config.search.result_limit);
    println!();

    println!("[geocoder]");
    println!("base_url = \"{}\"", config.geocoder.base_url);
    println!("user_agent = \"{}\"", config.geocoder.user_agent);
    println!();

    println!("[map]");
    println!("default_lat = {}", config.map.default_lat);
    println!("default_lng = {}", config.map.default_lng);
    println!("zoom = {}", config.map.zoom);
    println!();

    println!("[navigation]");
    println!("next_route = \"{}\"", config.navigation.next_route);
    println!();

    println!("[calculate]");
    println!("irradiance_w_m2 = {}", config.calculate.irradiance_w_m2);
    println!("peak_factor = {}", config.calculate.peak_factor);
    println!();

    println!("[storage]");
    match &config.storage.path {
        Some(path) => println!("path = \"{}\"", path.display()),
        None => println!("path = \"\" # default data directory"),
    }
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[url]");
    println!("default = \"{}\"", config.url.default);
    println!();

    println!("[url.providers]");
    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    for (name, template) in providers {
        println!("{} = \"{}\"", name, template);
    }
}
