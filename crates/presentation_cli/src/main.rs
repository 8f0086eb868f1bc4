//! evroute CLI
//!
//! Plans EV road trips with charging stops and lists nearby chargers.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod output;

use std::path::PathBuf;

use anyhow::Context;
use application::PlanRequest;
use clap::{Args, Parser, Subcommand};
use domain::{ChargingNetwork, GeoLocation, Location};
use infrastructure::{AppConfig, build_planner, init_logging, log_filter_from_verbosity};
use tracing::debug;

/// EV trip planner
#[derive(Debug, Parser)]
#[command(name = "evroute")]
#[command(author, version, about = "Plan EV road trips with charging stops", long_about = None)]
struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true, env = "EVROUTE_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plan a trip with charging stops
    ///
    /// Stops are either "lat,lon" or a free-form address.
    /// Example: evroute plan --from "34.05,-118.24" --to "San Francisco, CA" --range 270 --battery 90
    Plan(PlanArgs),

    /// List charging stations around a point
    ///
    /// Example: evroute stations --at 36.0,-119.96 --radius 10 --network tesla
    Stations(StationsArgs),

    /// Check that the routing and station providers are reachable
    ///
    /// Exits non-zero when routing is down, since no plan can be made.
    Status,
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Trip origin
    #[arg(long, value_parser = parse_location)]
    from: Location,

    /// Trip destination
    #[arg(long, value_parser = parse_location)]
    to: Location,

    /// Intermediate stop, in order (repeatable)
    #[arg(long = "via", value_parser = parse_location)]
    via: Vec<Location>,

    /// Full-charge range in miles
    #[arg(long)]
    range: f64,

    /// Current battery percentage
    #[arg(long)]
    battery: f64,

    /// Lowest battery percentage to plan for
    #[arg(long)]
    min_battery: Option<f64>,

    /// Percentage to charge up to at each stop
    #[arg(long)]
    max_battery: Option<f64>,

    /// Preferred charging network (repeatable)
    #[arg(long = "network")]
    networks: Vec<ChargingNetwork>,
}

#[derive(Debug, Args)]
struct StationsArgs {
    /// Search center as "lat,lon"
    #[arg(long)]
    at: GeoLocation,

    /// Search radius in miles (default: planner search radius)
    #[arg(long)]
    radius: Option<f64>,

    /// Minimum charger power in kW
    #[arg(long)]
    min_power: Option<f64>,

    /// Charging network filter (repeatable)
    #[arg(long = "network")]
    networks: Vec<ChargingNetwork>,
}

/// Parse a stop given as "lat,lon" or as an address to geocode
fn parse_location(value: &str) -> Result<Location, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("location must not be empty".to_string());
    }

    let numeric = value.split_once(',').is_some_and(|(lat, lon)| {
        lat.trim().parse::<f64>().is_ok() && lon.trim().parse::<f64>().is_ok()
    });
    if numeric {
        return value.parse::<GeoLocation>().map(Location::at);
    }

    Ok(Location::new(value, value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config.logging, log_filter_from_verbosity(cli.verbose))
        .context("initializing logging")?;
    debug!(?cli, "Starting");

    let planner = build_planner(&config)?;

    match cli.command {
        Commands::Plan(args) => {
            let request = PlanRequest::new(args.from, args.to, args.range, args.battery)
                .with_waypoints(args.via)
                .with_bounds(args.min_battery, args.max_battery)
                .with_networks(args.networks);
            let threshold = request.vehicle_profile(planner.config()).safety_threshold();

            let plan = planner.plan_route(&request).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
                for warning in output::safety_warnings(&plan, threshold) {
                    eprintln!("{warning}");
                }
            } else {
                println!("{}", output::render_plan(&plan, threshold));
            }
        },

        Commands::Stations(args) => {
            let networks = (!args.networks.is_empty()).then_some(args.networks.as_slice());
            let stations = planner
                .stations_near(args.at, args.radius, args.min_power, networks)
                .await;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stations)?);
            } else {
                println!("{}", output::render_stations(&stations));
            }
        },

        Commands::Status => {
            let status = planner.status().await;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", output::render_status(&status));
            }

            if !status.can_plan() {
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
