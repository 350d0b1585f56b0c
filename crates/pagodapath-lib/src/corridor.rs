use std::collections::HashSet;

use crate::dataset::{Atlas, PointId};
use crate::geo::{haversine_km, point_to_segment_km};
use crate::graph::compare_distance;

/// Corridor radius used when none is configured, in kilometres.
pub const DEFAULT_CORRIDOR_RADIUS_KM: f64 = 1.0;

/// How to measure a point's distance to a path.
///
/// `Vertex` reproduces the reference behavior: distance to the nearest path
/// *vertex*, not a true point-to-segment projection. That under-reports
/// nothing but over-reports distances for points abeam a long segment, which
/// was acceptable for the "points near your route" feature it serves.
/// `Segment` is the stricter great-circle point-to-segment measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProximityMeasure {
    #[default]
    Vertex,
    Segment,
}

/// An off-route point together with its distance to the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyPoint {
    pub id: PointId,
    pub distance_km: f64,
}

/// All atlas points within `max_distance_km` of the path, nearest first,
/// excluding the path's own points. Empty when nothing is in range.
pub fn nearby_points(
    atlas: &Atlas,
    path: &[PointId],
    max_distance_km: f64,
    measure: ProximityMeasure,
) -> Vec<NearbyPoint> {
    if path.is_empty() {
        return Vec::new();
    }

    let on_path: HashSet<PointId> = path.iter().copied().collect();
    let vertices: Vec<_> = path.iter().filter_map(|&id| atlas.position(id)).collect();
    if vertices.is_empty() {
        return Vec::new();
    }

    let mut nearby: Vec<NearbyPoint> = atlas
        .points
        .values()
        .filter(|point| !on_path.contains(&point.id))
        .filter_map(|point| {
            let distance_km = match measure {
                ProximityMeasure::Vertex => vertices
                    .iter()
                    .map(|&vertex| haversine_km(point.position, vertex))
                    .fold(f64::INFINITY, f64::min),
                ProximityMeasure::Segment => {
                    if vertices.len() < 2 {
                        haversine_km(point.position, vertices[0])
                    } else {
                        vertices
                            .windows(2)
                            .map(|pair| point_to_segment_km(point.position, pair[0], pair[1]))
                            .fold(f64::INFINITY, f64::min)
                    }
                }
            };
            (distance_km <= max_distance_km).then_some(NearbyPoint {
                id: point.id,
                distance_km,
            })
        })
        .collect();

    nearby.sort_by(|a, b| {
        compare_distance(a.distance_km, b.distance_km).then_with(|| a.id.cmp(&b.id))
    });
    nearby
}
