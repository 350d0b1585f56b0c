use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::dataset::{Atlas, PointId};
use crate::geo::haversine_km;

/// Connectivity threshold used when none is configured, in kilometres.
pub const DEFAULT_LINK_THRESHOLD_KM: f64 = 10.0;

/// Tunables for proximity graph construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphOptions {
    /// Two points are linked when their geodesic distance is at most this.
    pub threshold_km: f64,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            threshold_km: DEFAULT_LINK_THRESHOLD_KM,
        }
    }
}

/// Edge within the proximity graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: PointId,
    pub distance: f64,
}

/// Undirected weighted proximity graph over atlas points.
///
/// Built once per dataset snapshot and read-only thereafter; rebuilding
/// replaces the whole structure. Every edge is mirrored on both endpoints
/// with an identical weight and there are no self-edges.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    threshold_km: f64,
    adjacency: Arc<HashMap<PointId, Vec<Edge>>>,
}

impl Graph {
    /// Connectivity threshold this graph was built with.
    pub fn threshold_km(&self) -> f64 {
        self.threshold_km
    }

    /// Return the neighbours for a given point identifier.
    pub fn neighbours(&self, point: PointId) -> &[Edge] {
        self.adjacency
            .get(&point)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the point exists as a node (possibly isolated).
    pub fn contains(&self, point: PointId) -> bool {
        self.adjacency.contains_key(&point)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }
}

/// Build a proximity graph with the default connectivity threshold.
pub fn build_graph(atlas: &Atlas) -> Graph {
    build_graph_with(atlas, &GraphOptions::default())
}

/// Build a proximity graph linking every pair of points within the
/// configured threshold, edge weight = geodesic distance.
///
/// O(n²) pair enumeration, which is fine at the target scale of tens to low
/// hundreds of points. An empty atlas yields an empty graph; points with no
/// neighbour inside the threshold become isolated nodes.
pub fn build_graph_with(atlas: &Atlas, options: &GraphOptions) -> Graph {
    let mut adjacency: HashMap<PointId, Vec<Edge>> =
        atlas.points.keys().map(|&id| (id, Vec::new())).collect();

    let mut ids: Vec<PointId> = atlas.points.keys().copied().collect();
    ids.sort_unstable();

    for (index, &a) in ids.iter().enumerate() {
        let position_a = atlas.points[&a].position;
        for &b in &ids[index + 1..] {
            let distance = haversine_km(position_a, atlas.points[&b].position);
            if distance <= options.threshold_km {
                adjacency.entry(a).or_default().push(Edge { target: b, distance });
                adjacency.entry(b).or_default().push(Edge { target: a, distance });
            }
        }
    }

    for edges in adjacency.values_mut() {
        edges.sort_by(|a, b| {
            compare_distance(a.distance, b.distance).then_with(|| a.target.cmp(&b.target))
        });
    }

    let graph = Graph {
        threshold_km: options.threshold_km,
        adjacency: Arc::new(adjacency),
    };
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        threshold_km = options.threshold_km,
        "proximity graph built"
    );
    graph
}

pub(crate) fn compare_distance(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PointRecord;

    fn atlas_of(records: &[(&str, f64, f64)]) -> Atlas {
        let records: Vec<PointRecord> = records
            .iter()
            .map(|(name, lat, lng)| PointRecord {
                name: name.to_string(),
                lat: *lat,
                lng: *lng,
            })
            .collect();
        Atlas::from_records(&records).expect("valid records").0
    }

    #[test]
    fn empty_atlas_builds_empty_graph() {
        let graph = build_graph(&Atlas::default());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn edges_are_mirrored_with_identical_weight() {
        // Two points ~5.6 km apart on the equator, inside the threshold.
        let atlas = atlas_of(&[("A", 0.0, 0.0), ("B", 0.0, 0.05)]);
        let graph = build_graph(&atlas);

        let a = atlas.point_id_by_name("A").unwrap();
        let b = atlas.point_id_by_name("B").unwrap();
        let ab = graph.neighbours(a).iter().find(|e| e.target == b).expect("A links B");
        let ba = graph.neighbours(b).iter().find(|e| e.target == a).expect("B links A");
        assert_eq!(ab.distance, ba.distance);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn no_self_edges() {
        let atlas = atlas_of(&[("A", 0.0, 0.0), ("B", 0.0, 0.05)]);
        let graph = build_graph(&atlas);
        for &id in atlas.points.keys() {
            assert!(graph.neighbours(id).iter().all(|edge| edge.target != id));
        }
    }

    #[test]
    fn pairs_beyond_threshold_are_not_linked() {
        // ~22 km apart, well beyond the 10 km default.
        let atlas = atlas_of(&[("A", 0.0, 0.0), ("B", 0.0, 0.2)]);
        let graph = build_graph(&atlas);

        assert_eq!(graph.edge_count(), 0);
        let a = atlas.point_id_by_name("A").unwrap();
        assert!(graph.contains(a), "isolated node still present");
        assert!(graph.neighbours(a).is_empty());
    }

    #[test]
    fn custom_threshold_is_respected() {
        let atlas = atlas_of(&[("A", 0.0, 0.0), ("B", 0.0, 0.05)]);
        let options = GraphOptions { threshold_km: 1.0 };
        let graph = build_graph_with(&atlas, &options);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.threshold_km(), 1.0);
    }

    #[test]
    fn construction_is_deterministic() {
        let points = [
            ("A", 0.0, 0.0),
            ("B", 0.0, 0.05),
            ("C", 0.05, 0.0),
            ("D", 0.03, 0.03),
        ];
        let forward = atlas_of(&points);
        let mut reversed_points = points;
        reversed_points.reverse();

        let graph_a = build_graph(&forward);
        let graph_b = build_graph(&forward);
        for &id in forward.points.keys() {
            assert_eq!(graph_a.neighbours(id), graph_b.neighbours(id));
        }

        // Same edge set regardless of input order, compared by name pairs.
        let reversed = atlas_of(&reversed_points);
        let graph_c = build_graph(&reversed);
        let edge_names = |atlas: &Atlas, graph: &Graph| {
            let mut names: Vec<(String, String)> = atlas
                .points
                .keys()
                .flat_map(|&id| {
                    graph.neighbours(id).iter().map(move |edge| (id, edge.target))
                })
                .map(|(from, to)| {
                    let mut pair = [
                        atlas.point_name(from).unwrap().to_string(),
                        atlas.point_name(to).unwrap().to_string(),
                    ];
                    pair.sort();
                    (pair[0].clone(), pair[1].clone())
                })
                .collect();
            names.sort();
            names.dedup();
            names
        };
        assert_eq!(edge_names(&forward, &graph_a), edge_names(&reversed, &graph_c));
    }
}
