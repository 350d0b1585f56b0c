//! Pagoda route pathfinding HTTP microservice.
//!
//! # Endpoints
//!
//! - `POST /api/v1/path` - Compute a route between two points, with nearby
//!   points along the way
//! - `GET /api/v1/points` - List the available points
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! # Configuration
//!
//! - `PAGODAPATH_DATA_PATH` - Path to the JSON point dataset (default:
//!   /data/pagodas.json)
//! - `PAGODAPATH_THRESHOLD_KM` - Graph connectivity threshold (default: 10)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::env;
use std::net::SocketAddr;

use tracing::{error, info};

use pagodapath_lib::{GraphOptions, DEFAULT_LINK_THRESHOLD_KM};
use pagodapath_service::{app, init_logging, AppState, LoggingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env());

    let data_path =
        env::var("PAGODAPATH_DATA_PATH").unwrap_or_else(|_| "/data/pagodas.json".to_string());
    let threshold_km: f64 = env::var("PAGODAPATH_THRESHOLD_KM")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_LINK_THRESHOLD_KM);
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);

    info!(data_path = %data_path, threshold_km, port, "starting pathfinding service");

    let state = AppState::load(&data_path, GraphOptions { threshold_km }).map_err(|e| {
        error!(error = %e, path = %data_path, "failed to load application state");
        e
    })?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
