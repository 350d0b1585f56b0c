use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CacheStats, RouteCache};
use crate::corridor::{nearby_points, ProximityMeasure};
use crate::dataset::{Atlas, LoadReport, PointId, PointRecord};
use crate::error::Result;
use crate::graph::{build_graph_with, Graph, GraphOptions};
use crate::search::find_route;

/// A planned route expressed in point names, ready for external callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Ordered point names from start to goal inclusive.
    pub steps: Vec<String>,
    /// Total route distance in kilometres.
    pub distance_km: f64,
}

impl RoutePlan {
    /// Number of points on the route.
    pub fn path_length(&self) -> usize {
        self.steps.len()
    }

    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Point listing entry for external start/end selectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointInfo {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// An off-route point by name with its distance to the path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedNearbyPoint {
    pub name: String,
    pub distance_km: f64,
}

/// Everything derived from one dataset snapshot. Replaced wholesale on
/// reload so in-flight queries keep reading a consistent graph, and the
/// cache can never outlive the graph it was filled from.
struct Snapshot {
    atlas: Atlas,
    graph: Graph,
    cache: Mutex<RouteCache>,
}

impl Snapshot {
    fn empty(options: &GraphOptions) -> Self {
        let atlas = Atlas::default();
        let graph = build_graph_with(&atlas, options);
        Self {
            atlas,
            graph,
            cache: Mutex::new(RouteCache::new()),
        }
    }
}

/// Facade over graph construction, search, caching, and corridor lookups.
///
/// Read-only queries may run concurrently from any number of threads; the
/// only write, `load_points`, swaps in a freshly built snapshot atomically.
pub struct Pathfinder {
    options: GraphOptions,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl Pathfinder {
    /// Create a pathfinder with the default connectivity threshold and no
    /// points loaded.
    pub fn new() -> Self {
        Self::with_options(GraphOptions::default())
    }

    pub fn with_options(options: GraphOptions) -> Self {
        Self {
            options,
            snapshot: RwLock::new(Arc::new(Snapshot::empty(&options))),
        }
    }

    /// Replace the dataset: validate records, rebuild the graph, and discard
    /// the route cache. This is the only way the graph changes.
    pub fn load_points(&self, records: &[PointRecord]) -> Result<LoadReport> {
        let (atlas, report) = Atlas::from_records(records)?;
        let graph = build_graph_with(&atlas, &self.options);
        info!(
            points = report.loaded,
            skipped = report.skipped,
            edges = graph.edge_count(),
            threshold_km = self.options.threshold_km,
            "dataset loaded"
        );

        let snapshot = Arc::new(Snapshot {
            atlas,
            graph,
            cache: Mutex::new(RouteCache::new()),
        });
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;
        Ok(report)
    }

    /// Find the shortest route between two named points.
    ///
    /// Returns `Err(UnknownPoint)` when either name is absent, `Ok(None)`
    /// when the points are known but disconnected, and `Ok(Some(plan))`
    /// otherwise. `start == goal` is a named contract: the trivial
    /// single-point plan with zero distance. Outcomes, including negative
    /// ones, are memoized per graph snapshot.
    pub fn find_path(&self, start: &str, goal: &str) -> Result<Option<RoutePlan>> {
        let snapshot = self.current();
        let start_id = snapshot.atlas.resolve(start)?;
        let goal_id = snapshot.atlas.resolve(goal)?;

        let cached = {
            let mut cache = snapshot
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            cache.get(start_id, goal_id)
        };
        if let Some(outcome) = cached {
            debug!(start, goal, "route served from cache");
            return Ok(outcome.map(|route| self.plan_from_steps(&snapshot.atlas, &route.steps, route.distance_km)));
        }

        let outcome = find_route(&snapshot.graph, &snapshot.atlas, start_id, goal_id);
        {
            let mut cache = snapshot
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            cache.insert(start_id, goal_id, outcome.clone());
        }

        Ok(outcome.map(|route| self.plan_from_steps(&snapshot.atlas, &route.steps, route.distance_km)))
    }

    /// All loaded points sorted by name.
    pub fn list_points(&self) -> Vec<PointInfo> {
        let snapshot = self.current();
        let mut points: Vec<PointInfo> = snapshot
            .atlas
            .points
            .values()
            .map(|point| PointInfo {
                name: point.name.clone(),
                lat: point.position.lat,
                lng: point.position.lng,
            })
            .collect();
        points.sort_by(|a, b| a.name.cmp(&b.name));
        points
    }

    /// Points within `max_distance_km` of the named path, nearest first.
    pub fn nearby_along_path<S: AsRef<str>>(
        &self,
        path: &[S],
        max_distance_km: f64,
        measure: ProximityMeasure,
    ) -> Result<Vec<NamedNearbyPoint>> {
        let snapshot = self.current();
        let ids = path
            .iter()
            .map(|name| snapshot.atlas.resolve(name.as_ref()))
            .collect::<Result<Vec<PointId>>>()?;

        let nearby = nearby_points(&snapshot.atlas, &ids, max_distance_km, measure);
        Ok(nearby
            .into_iter()
            .filter_map(|entry| {
                snapshot
                    .atlas
                    .point_name(entry.id)
                    .map(|name| NamedNearbyPoint {
                        name: name.to_string(),
                        distance_km: entry.distance_km,
                    })
            })
            .collect())
    }

    /// Number of points in the current snapshot.
    pub fn point_count(&self) -> usize {
        self.current().atlas.len()
    }

    /// Connectivity threshold the pathfinder builds graphs with.
    pub fn threshold_km(&self) -> f64 {
        self.options.threshold_km
    }

    /// Counters for the current snapshot's route cache.
    pub fn cache_stats(&self) -> CacheStats {
        let snapshot = self.current();
        let cache = snapshot
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cache.stats()
    }

    fn current(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn plan_from_steps(&self, atlas: &Atlas, steps: &[PointId], distance_km: f64) -> RoutePlan {
        RoutePlan {
            steps: steps
                .iter()
                .filter_map(|&id| atlas.point_name(id).map(String::from))
                .collect(),
            distance_km,
        }
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Pathfinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pathfinder")
            .field("points", &self.point_count())
            .field("threshold_km", &self.options.threshold_km)
            .finish()
    }
}
