//! # Tide Times Application Entry Point
//!
//! Command line front end for the fetch-and-classify pipeline. It resolves
//! the location to chart (flags, the saved store, or the sample default),
//! loads configuration and the WorldTides access key, runs a single fetch on
//! a Tokio runtime and renders the classified report as an ASCII chart or as
//! JSON.
//!
//! Fetch failures surface as errors with context rather than synthetic data;
//! rerunning the program is the retry.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tide_times_lib::config::{self, Config};
use tide_times_lib::worldtides::TideClient;
use tide_times_lib::{renderer, store, Coordinate, TideReport};

/// Fetch and chart tide heights for a saved location.
#[derive(Parser, Debug)]
#[command(name = "tide-times", version, about)]
struct Cli {
    /// Display name for the location given with --lat/--lon
    #[arg(long, requires = "lat")]
    name: Option<String>,

    /// Latitude in decimal degrees; pairs with --lon
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees; pairs with --lat
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Read configuration from this file instead of ./tide-times.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of drawing the chart
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Location picked on the command line, when both halves were given.
    fn selection(&self) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Some(Coordinate {
                name: self
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{latitude:.4}, {longitude:.4}")),
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Starting location for installs that have never picked one.
fn sample_location() -> Coordinate {
    Coordinate {
        name: "San Francisco".to_string(),
        latitude: 37.7749,
        longitude: -122.4194,
    }
}

/// Decide which location this run is about and keep the store current.
///
/// A location given on the command line wins and is saved for next time.
/// Otherwise the saved one is used; a missing store falls back to the sample
/// location (saved, so later runs are explicit about what they chart) and an
/// unreadable store falls back without writing, leaving repair to the next
/// explicit selection.
fn resolve_location(selection: Option<Coordinate>, store_path: &Path) -> Coordinate {
    if let Some(location) = selection {
        if let Err(err) = store::save_to_path(&location, store_path) {
            warn!("could not save location: {err}");
        }
        return location;
    }

    match store::load_from_path(store_path) {
        Ok(Some(location)) => location,
        Ok(None) => {
            let location = sample_location();
            info!("no saved location, starting with {}", location.name);
            if let Err(err) = store::save_to_path(&location, store_path) {
                warn!("could not save location: {err}");
            }
            location
        }
        Err(err) => {
            warn!("could not read saved location: {err}");
            sample_location()
        }
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tide_times=info,tide_times_lib=info")),
        )
        .init();

    let cli = Cli::parse();

    let app_config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    let location = resolve_location(cli.selection(), &store::default_path());

    let api_key = app_config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "no WorldTides API key configured; set {} or add `key` to the \
             [api] section of tide-times.toml",
            config::API_KEY_ENV
        )
    })?;

    let client =
        TideClient::new(&app_config.api.base_url, &api_key).context("building HTTP client")?;

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    info!("fetching tide heights for {}", location.name);
    let now = Utc::now();
    let samples = rt
        .block_on(client.fetch_heights(&location, now))
        .with_context(|| format!("fetching tide heights for {}", location.name))?;

    let report = TideReport::new(location, samples, now);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        renderer::draw_ascii(&report);
    }

    Ok(())
}
