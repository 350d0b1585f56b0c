//! Pagodapath library entry points.
//!
//! This crate loads a named point dataset, builds an undirected proximity
//! graph over it, and runs A* route searches with corridor ("points near
//! your route") lookups on top. Higher-level consumers (CLI, HTTP service)
//! should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod cache;
pub mod corridor;
pub mod dataset;
pub mod error;
pub mod facade;
pub mod geo;
pub mod graph;
pub mod search;

pub use cache::{CacheStats, RouteCache, DEFAULT_CACHE_CAPACITY};
pub use corridor::{nearby_points, NearbyPoint, ProximityMeasure, DEFAULT_CORRIDOR_RADIUS_KM};
pub use dataset::{load_points, Atlas, LoadReport, Point, PointId, PointRecord};
pub use error::{Error, Result};
pub use facade::{NamedNearbyPoint, Pathfinder, PointInfo, RoutePlan};
pub use geo::{haversine_km, point_to_segment_km, Coordinates, EARTH_RADIUS_KM};
pub use graph::{build_graph, build_graph_with, Edge, Graph, GraphOptions, DEFAULT_LINK_THRESHOLD_KM};
pub use search::{find_route, Route};
