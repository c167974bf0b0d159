use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use housing_radar::location::{FixedLocationProvider, HttpLocationProvider, LocationProvider};
use housing_radar::map::HeadlessMap;
use housing_radar::models::{load_listings, LatLng, MatchedListing, SearchShape};
use housing_radar::{GeolocationError, SearchConfig, SearchObserver, SearchPage};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "housing-radar", about = "Map search over property listings", version)]
struct Cli {
    /// JSON array of listings
    #[arg(long)]
    listings: PathBuf,

    /// JSON search config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write matches to this file as JSON
    #[arg(long)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Listings near the device location
    Near {
        #[arg(long, allow_negative_numbers = true, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,
        /// Resolve the location from an HTTP endpoint instead
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        endpoint: Option<String>,
        /// Simulate a denied permission prompt
        #[arg(long, conflicts_with_all = ["lat", "lng", "endpoint"])]
        deny: bool,
    },
    /// Listings inside a drawn circle
    Circle {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Radius in meters
        #[arg(long)]
        radius: f64,
    },
}

/// Prints what the page reports
#[derive(Default)]
struct ConsoleObserver {
    geolocation_failed: bool,
}

impl SearchObserver for ConsoleObserver {
    fn on_properties_found(&mut self, matches: &[MatchedListing]) {
        info!("{} properties found", matches.len());
    }

    fn on_geolocation_error(&mut self) {
        self.geolocation_failed = true;
    }

    fn on_loading_changed(&mut self, loading: bool) {
        if loading {
            info!("Locating device...");
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => SearchConfig::load(path).await?,
        None => SearchConfig::default(),
    };
    let listings = load_listings(&cli.listings).await?;
    let map = HeadlessMap::new(config.fallback_view());
    let mut page = SearchPage::new(config, listings, map, ConsoleObserver::default());

    match cli.command {
        Command::Near {
            lat,
            lng,
            endpoint,
            deny,
        } => {
            let provider: Box<dyn LocationProvider> = match (lat, lng, endpoint) {
                _ if deny => Box::new(FixedLocationProvider::failing(GeolocationError::Denied)),
                (Some(lat), Some(lng), _) => Box::new(FixedLocationProvider::at(LatLng::new(lat, lng))),
                (_, _, Some(endpoint)) => Box::new(HttpLocationProvider::new(endpoint)?),
                _ => bail!("near needs --lat/--lng, --endpoint or --deny"),
            };

            page.locate(provider.as_ref()).await;
            if page.observer().geolocation_failed {
                bail!("Could not determine your location");
            }
        }
        Command::Circle { lat, lng, radius } => {
            if !(radius.is_finite() && radius >= 0.0) {
                bail!("radius must be a non-negative number of meters");
            }
            page.request_draw();
            page.shape_created(SearchShape::circle(LatLng::new(lat, lng), radius));
            page.drawing_stopped();
        }
    }

    let matches = page.results();
    for (i, m) in matches.iter().enumerate() {
        println!("{}. {} ({:.0} m)", i + 1, m.listing.title, m.distance);
        println!("   {}", m.listing.address);
        println!("   ID: {}", m.listing.id);
        println!();
    }

    if let Some(path) = &cli.output {
        let json = serde_json::to_string_pretty(matches)?;
        tokio::fs::write(path, json).await?;
        info!("Saved {} matches to {}", matches.len(), path.display());
    }

    Ok(())
}
