use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, shared by all great-circle math.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Great-circle distance between two coordinates using the haversine formula.
///
/// Total over all real inputs; callers are expected to supply valid degrees.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Great-circle distance from `point` to the segment between `start` and
/// `end`, using cross-track distance with endpoint clamping.
pub fn point_to_segment_km(point: Coordinates, start: Coordinates, end: Coordinates) -> f64 {
    let segment_angular = haversine_km(start, end) / EARTH_RADIUS_KM;
    if segment_angular == 0.0 {
        return haversine_km(point, start);
    }

    let to_point_angular = haversine_km(start, point) / EARTH_RADIUS_KM;
    let bearing_point = initial_bearing(start, point);
    let bearing_segment = initial_bearing(start, end);

    // Projection falls behind the start vertex.
    if (bearing_point - bearing_segment).cos() <= 0.0 {
        return haversine_km(point, start);
    }

    let cross_track = (to_point_angular.sin() * (bearing_point - bearing_segment).sin()).asin();
    // Clamp guards against rounding pushing the ratio marginally past 1.
    let along_track = (to_point_angular.cos() / cross_track.cos())
        .clamp(-1.0, 1.0)
        .acos();

    // Projection falls beyond the end vertex.
    if along_track > segment_angular {
        return haversine_km(point, end);
    }

    cross_track.abs() * EARTH_RADIUS_KM
}

/// Initial bearing from `a` to `b` in radians.
fn initial_bearing(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
    y.atan2(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KM_PER_DEGREE: f64 = 111.195;

    #[test]
    fn haversine_is_symmetric() {
        let a = Coordinates::new(21.1717, 94.8585);
        let b = Coordinates::new(21.1639, 94.8673);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        let a = Coordinates::new(21.1717, 94.8585);
        assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn haversine_matches_degree_scale_at_equator() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 1.0);
        let distance = haversine_km(a, b);
        assert!((distance - KM_PER_DEGREE).abs() < 0.01, "got {distance}");
    }

    #[test]
    fn segment_distance_uses_perpendicular_when_projection_is_interior() {
        // Point sits 0.01 degrees (~1.11 km) north of the midpoint of an
        // equatorial segment.
        let start = Coordinates::new(0.0, 0.0);
        let end = Coordinates::new(0.0, 0.2);
        let point = Coordinates::new(0.01, 0.1);

        let distance = point_to_segment_km(point, start, end);
        assert!((distance - 0.01 * KM_PER_DEGREE).abs() < 0.01, "got {distance}");
    }

    #[test]
    fn segment_distance_clamps_to_nearest_endpoint() {
        let start = Coordinates::new(0.0, 0.0);
        let end = Coordinates::new(0.0, 0.2);
        let behind = Coordinates::new(0.0, -0.1);
        let beyond = Coordinates::new(0.0, 0.3);

        let to_start = point_to_segment_km(behind, start, end);
        let to_end = point_to_segment_km(beyond, start, end);
        assert!((to_start - haversine_km(behind, start)).abs() < 1e-9);
        assert!((to_end - haversine_km(beyond, end)).abs() < 1e-9);
    }

    #[test]
    fn degenerate_segment_falls_back_to_point_distance() {
        let vertex = Coordinates::new(0.0, 0.0);
        let point = Coordinates::new(0.0, 0.05);
        let distance = point_to_segment_km(point, vertex, vertex);
        assert_eq!(distance, haversine_km(point, vertex));
    }
}
