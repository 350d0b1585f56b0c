use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::warn;

use crate::dataset::{Atlas, PointId};
use crate::geo::haversine_km;
use crate::graph::Graph;

/// A computed route between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Ordered point identifiers from start to goal inclusive.
    pub steps: Vec<PointId>,
    /// Accumulated edge weight along consecutive pairs, in kilometres.
    pub distance_km: f64,
}

impl Route {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Same route walked in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut steps = self.steps.clone();
        steps.reverse();
        Self {
            steps,
            distance_km: self.distance_km,
        }
    }
}

/// Find the lowest-total-weight route between `start` and `goal` using A*
/// with the haversine straight-line distance as the heuristic.
///
/// The heuristic is admissible because every edge weight is itself a
/// haversine distance, so the first time the goal is popped its route is
/// globally shortest. Returns `None` for disconnected pairs; that is a
/// legitimate negative outcome, not an error. `start == goal` yields the
/// trivial single-step route with zero distance.
///
/// Callers must resolve names to identifiers first; unknown identifiers
/// simply produce `None` since they have no node entry.
pub fn find_route(graph: &Graph, atlas: &Atlas, start: PointId, goal: PointId) -> Option<Route> {
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }
    if start == goal {
        return Some(Route {
            steps: vec![start],
            distance_km: 0.0,
        });
    }

    let mut g_score: HashMap<PointId, f64> = HashMap::new();
    let mut parents: HashMap<PointId, Option<PointId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    g_score.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(SearchEntry::new(start, 0.0, heuristic(atlas, start, goal)));

    // Safety margin only: the open set is already finite, but a hard cap
    // bounds latency if a malformed graph ever reaches this point.
    let pop_budget = graph.node_count().saturating_mul(8).max(1024);
    let mut pops = 0usize;

    while let Some(entry) = queue.pop() {
        pops += 1;
        if pops > pop_budget {
            warn!(start, goal, pop_budget, "search exceeded pop budget, treating as unreachable");
            return None;
        }

        // Skip stale duplicate entries left behind by later relaxations.
        let current_score = match g_score.get(&entry.node) {
            Some(score) if *score < entry.cost.0 => continue,
            Some(score) => *score,
            None => continue,
        };

        if entry.node == goal {
            return Some(Route {
                steps: reconstruct_path(&parents, start, goal),
                distance_km: current_score,
            });
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            let tentative_g = current_score + edge.distance;
            if tentative_g < *g_score.get(&next).unwrap_or(&f64::INFINITY) {
                g_score.insert(next, tentative_g);
                parents.insert(next, Some(entry.node));
                queue.push(SearchEntry::new(next, tentative_g, heuristic(atlas, next, goal)));
            }
        }
    }

    None
}

fn heuristic(atlas: &Atlas, from: PointId, to: PointId) -> f64 {
    match (atlas.position(from), atlas.position(to)) {
        (Some(a), Some(b)) => haversine_km(a, b),
        _ => 0.0,
    }
}

fn reconstruct_path(
    parents: &HashMap<PointId, Option<PointId>>,
    start: PointId,
    goal: PointId,
) -> Vec<PointId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct SearchEntry {
    node: PointId,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl SearchEntry {
    fn new(node: PointId, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for SearchEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by f-score; node
        // id breaks ties deterministically.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for SearchEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
