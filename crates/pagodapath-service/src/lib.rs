//! Pagoda route pathfinding HTTP microservice.
//!
//! The binary in `main.rs` wires environment configuration to the router
//! assembled here; integration tests drive the same router in-memory.

pub mod logging;
pub mod problem;
pub mod routes;
pub mod state;

pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use problem::{from_lib_error, ProblemDetails};
pub use routes::{app, PathRequest, PathResponse};
pub use state::AppState;
