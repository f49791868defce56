//! Interactive nearest delivery point finder.
//!
//! Loads the delivery point catalog, fills in missing geolocations through
//! Nominatim (caching every result), and prints the points closest to the
//! user with a directions link for each.

mod prompt;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dropoff::config::Config;
use dropoff::geocoder::{Geocoder, NominatimGeocoder};
use dropoff::ranking::{rank, DistanceCalc, GeodesicCalc, HaversineCalc, DEFAULT_LIMIT};
use dropoff::resolve::{resolve_all, ResolveOptions};
use dropoff::routing::{routing_link, Vehicle};
use dropoff::store::{load_points, CacheStore, RecordFormat};
use dropoff::{DistanceUnit, Geolocation};

/// Nominatim's public instance allows one request per second
const DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Parser, Debug)]
#[command(name = "nearest")]
#[command(about = "Find the delivery points nearest to you")]
struct Args {
    /// Delivery points file from the post office website (never modified)
    #[arg(long, default_value = "delivery points.json")]
    data_file: PathBuf,

    /// Cache of geocoded delivery points (.json or .csv)
    #[arg(long, default_value = "delivery points meta.json")]
    cache_file: PathBuf,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Your location as "<lat>, <lon>" (prompts for an address when omitted)
    #[arg(long)]
    location: Option<Geolocation>,

    /// Number of delivery points to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Unit for printed distances
    #[arg(long, value_enum, default_value_t = DistanceUnit::Kilometers)]
    unit: DistanceUnit,

    /// Travel mode for directions links
    #[arg(long, value_enum, default_value_t = Vehicle::Car)]
    vehicle: Vehicle,

    /// Distance formula
    #[arg(long, value_enum, default_value_t = Calculator::Geodesic)]
    calculator: Calculator,

    /// Fetch missing geolocations without asking
    #[arg(short, long, conflicts_with = "no_resolve")]
    yes: bool,

    /// Never fetch missing geolocations
    #[arg(long)]
    no_resolve: bool,

    /// Retry failed lookups as free-text searches
    #[arg(long)]
    fallback: bool,

    /// Pause between geocoder requests, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Nominatim base URL
    #[arg(long)]
    nominatim_url: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Calculator {
    Haversine,
    Geodesic,
}

impl Calculator {
    fn build(self) -> Box<dyn DistanceCalc> {
        match self {
            Calculator::Haversine => Box::new(HaversineCalc),
            Calculator::Geodesic => Box::new(GeodesicCalc),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    // Unsupported formats are fatal before any network traffic
    let mut cache = CacheStore::new(&args.cache_file)?;
    RecordFormat::from_path(&args.data_file)?;

    let mut nominatim = config.geocoder.to_nominatim();
    if let Some(url) = &args.nominatim_url {
        nominatim.base_url = url.clone();
    }
    info!("Using Nominatim at {}", nominatim.base_url);
    let geocoder = NominatimGeocoder::new(nominatim)?;

    println!("---- Welcome to the delivery points system ----");

    let reference = match args.location {
        Some(location) => location,
        None => {
            let query = prompt::location_query()?;
            geocoder
                .search_string(&query)
                .await
                .with_context(|| format!("Could not find location {:?}", query))?
        }
    };
    println!("[+] Your current location is: {}", reference);

    let mut points = load_points(&args.data_file, &cache).context("Failed to load delivery points")?;

    let unresolved = points.iter().filter(|p| !p.is_resolved()).count();
    if unresolved > 0 && should_resolve(&args, unresolved)? {
        let delay_ms = args
            .delay_ms
            .or(config.resolve.delay_ms)
            .unwrap_or(DEFAULT_DELAY_MS);
        let options = ResolveOptions {
            fallback: args.fallback || config.resolve.fallback.unwrap_or(false),
            delay: (delay_ms > 0).then(|| Duration::from_millis(delay_ms)),
        };

        let pb = progress_bar(points.len() as u64)?;
        let summary = resolve_all(&mut points, &geocoder, &mut cache, &options, &pb).await?;
        pb.finish_with_message("Geolocation data fetched");

        println!(
            "[+] {} resolved, {} not found, {} already cached",
            summary.resolved, summary.failed, summary.skipped
        );
    } else if unresolved > 0 {
        warn!("{} points have no geolocation and won't be ranked", unresolved);
    }

    let calc = args.calculator.build();
    let ranked = rank(reference, &points, calc.as_ref(), args.limit);
    if ranked.is_empty() {
        println!("[-] No delivery points with a known geolocation");
    }

    for entry in ranked {
        println!();
        println!("{}", entry.point);
        if !entry.point.branch_name.is_empty() {
            println!("Branch: {}", entry.point.branch_name);
        }
        if !entry.point.description.is_empty() {
            println!("Details: {}", entry.point.description);
        }
        println!("Distance: {}", entry.distance.convert(args.unit));
        println!(
            "Route: {}",
            routing_link(reference, entry.geolocation, args.vehicle)
        );
    }

    Ok(())
}

fn should_resolve(args: &Args, unresolved: usize) -> Result<bool> {
    if args.yes {
        return Ok(true);
    }
    if args.no_resolve {
        return Ok(false);
    }
    prompt::confirm_resolve(unresolved)
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            let subscriber = builder.with_ansi(false).with_writer(Mutex::new(file)).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "[+] Fetching geolocation data {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
