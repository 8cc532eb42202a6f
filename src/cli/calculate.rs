//! Calculate command handler
//!
//! Estimates yearly solar output for the stored location.

use crate::calculate::{calculate, CalculateForm, Estimate};
use crate::cli::open_location_store;
use crate::config::Config;
use crate::error::{Error, Result};
use chrono::Datelike;
use clap::Args;

/// Calculate command arguments
#[derive(Args)]
pub struct CalculateArgs {
    /// Roof area in square metres
    #[arg(long, short = 'a')]
    pub roof_area: Option<String>,

    /// PV technology: monocrystalline, polycrystalline or thinFilm
    #[arg(long, short = 't')]
    pub technology: Option<String>,

    /// Roof azimuth in degrees
    #[arg(long, default_value = "0")]
    pub azimuth: String,

    /// Mounting slope in degrees
    #[arg(long, default_value = "0")]
    pub slope: String,

    /// Mean irradiance in W/m² (overrides config)
    #[arg(long)]
    pub irradiance: Option<f64>,

    /// Year to estimate (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Run the calculate command
pub fn run(args: CalculateArgs) -> Result<()> {
    let config = Config::load()?;
    let location = open_location_store(&config)?.load()?.ok_or_else(|| {
        Error::InvalidInput("No location selected; run `solarscope search` first".to_string())
    })?;

    let mut params = config.calculate.clone();
    if let Some(irradiance) = args.irradiance {
        params.irradiance_w_m2 = irradiance;
    }

    let form = CalculateForm {
        roof_area: args.roof_area,
        pv_technology: args.technology,
        azimuth: Some(args.azimuth),
        mounting_slope: Some(args.slope),
    };
    let year = args.year.unwrap_or_else(|| chrono::Local::now().year());

    let estimate = calculate(&form, &location, year, &params).map_err(|errors| {
        for (field, messages) in errors.iter() {
            for message in messages {
                eprintln!("  {}: {}", field, message);
            }
        }
        Error::InvalidInput("Calculation form has errors".to_string())
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        print!("{}", render_table(&location.label, &estimate));
    }
    Ok(())
}

fn render_table(label: &str, estimate: &Estimate) -> String {
    let mut out = String::new();
    out.push_str(&format!("Location: {} ({})\n", label, estimate.location));
    out.push_str(&format!(
        "Roof: {} m², {}, {}\n\n",
        estimate.roof_area_m2, estimate.technology, estimate.year
    ));
    out.push_str(&format!("{:<10} {:>9} {:>10}\n", "Month", "Daylight", "kWh"));
    for month in &estimate.months {
        out.push_str(&format!(
            "{:<10} {:>8.1}h {:>10.1}\n",
            month.name, month.daylight_hours, month.energy_kwh
        ));
    }
    out.push_str(&format!("{:<10} {:>9} {:>10.1}\n", "Total", "", estimate.annual_kwh));
    out
}
