use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pagodapath_lib::{
    load_points, GraphOptions, Pathfinder, ProximityMeasure, DEFAULT_CORRIDOR_RADIUS_KM,
    DEFAULT_LINK_THRESHOLD_KM,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Pagoda route pathfinding utilities")]
struct Cli {
    /// Path to the point dataset (JSON array of {name, lat, lng}).
    #[arg(long)]
    data: PathBuf,

    /// Connectivity threshold in kilometres.
    #[arg(long, default_value_t = DEFAULT_LINK_THRESHOLD_KM)]
    threshold_km: f64,

    /// Emit machine-readable JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available points in the dataset.
    Points,
    /// Compute the shortest route between two named points.
    Route {
        /// Starting point name.
        #[arg(long = "from")]
        from: String,
        /// Destination point name.
        #[arg(long = "to")]
        to: String,
        /// Also list points within this distance of the route, in km.
        #[arg(long)]
        nearby_km: Option<f64>,
    },
    /// List points within a radius of a single named point.
    Nearby {
        /// Point name to search around.
        #[arg(long)]
        point: String,
        /// Search radius in kilometres.
        #[arg(long, default_value_t = DEFAULT_CORRIDOR_RADIUS_KM)]
        radius_km: f64,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let pathfinder = load_pathfinder(&cli.data, cli.threshold_km)?;
    match cli.command {
        Command::Points => handle_points(&pathfinder, cli.json),
        Command::Route {
            from,
            to,
            nearby_km,
        } => handle_route(&pathfinder, &from, &to, nearby_km, cli.json),
        Command::Nearby { point, radius_km } => {
            handle_nearby(&pathfinder, &point, radius_km, cli.json)
        }
    }
}

fn load_pathfinder(data: &Path, threshold_km: f64) -> Result<Pathfinder> {
    let records = load_points(data)
        .with_context(|| format!("failed to load point dataset from {}", data.display()))?;
    let pathfinder = Pathfinder::with_options(GraphOptions { threshold_km });
    let report = pathfinder
        .load_points(&records)
        .context("failed to build the proximity graph")?;
    if report.skipped > 0 {
        eprintln!("warning: skipped {} invalid point(s)", report.skipped);
    }
    Ok(pathfinder)
}

fn handle_points(pathfinder: &Pathfinder, json: bool) -> Result<()> {
    let points = pathfinder.list_points();
    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("{} point(s):", points.len());
    for point in points {
        println!("- {} ({:.6}, {:.6})", point.name, point.lat, point.lng);
    }
    Ok(())
}

fn handle_route(
    pathfinder: &Pathfinder,
    from: &str,
    to: &str,
    nearby_km: Option<f64>,
    json: bool,
) -> Result<()> {
    let plan = pathfinder.find_path(from, to)?;

    let Some(plan) = plan else {
        if json {
            println!(
                "{}",
                serde_json::json!({ "success": false, "message": format!("no route found between {from} and {to}") })
            );
        } else {
            println!("No route found between {from} and {to}.");
        }
        return Ok(());
    };

    let nearby = match nearby_km {
        Some(radius) => {
            pathfinder.nearby_along_path(&plan.steps, radius, ProximityMeasure::Vertex)?
        }
        None => Vec::new(),
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "success": true,
                "path": plan.steps,
                "distance_km": plan.distance_km,
                "path_length": plan.path_length(),
                "nearby_points": nearby,
            })
        );
        return Ok(());
    }

    println!("Route ({:.2} km, {} hops):", plan.distance_km, plan.hop_count());
    for step in &plan.steps {
        println!("- {step}");
    }
    if !nearby.is_empty() {
        println!("Nearby:");
        for entry in nearby {
            println!("- {} ({:.2} km)", entry.name, entry.distance_km);
        }
    }
    Ok(())
}

fn handle_nearby(pathfinder: &Pathfinder, point: &str, radius_km: f64, json: bool) -> Result<()> {
    let nearby =
        pathfinder.nearby_along_path(&[point], radius_km, ProximityMeasure::Vertex)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&nearby)?);
        return Ok(());
    }

    if nearby.is_empty() {
        println!("No points within {radius_km:.2} km of {point}.");
        return Ok(());
    }
    println!("Points within {radius_km:.2} km of {point}:");
    for entry in nearby {
        println!("- {} ({:.2} km)", entry.name, entry.distance_km);
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
