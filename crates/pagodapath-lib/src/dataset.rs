use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::Coordinates;

/// Numeric identifier for a point, assigned densely at load time.
pub type PointId = u32;

/// Raw point record supplied by the collaborating dataset layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// A named, geolocated point after validation and id assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub name: String,
    pub position: Coordinates,
}

/// Summary of a dataset load, reporting how many records survived validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// In-memory point catalogue with name interning.
#[derive(Debug, Clone, Default)]
pub struct Atlas {
    pub points: HashMap<PointId, Point>,
    pub name_to_id: HashMap<String, PointId>,
}

impl Atlas {
    /// Build an atlas from raw records.
    ///
    /// Records with non-finite coordinates are skipped with a diagnostic
    /// rather than failing the whole load. Duplicate names are an error since
    /// names are the external identity of a point.
    pub fn from_records(records: &[PointRecord]) -> Result<(Self, LoadReport)> {
        let mut atlas = Atlas::default();
        let mut skipped = 0usize;

        for record in records {
            let position = Coordinates::new(record.lat, record.lng);
            if !position.is_finite() {
                warn!(
                    name = %record.name,
                    lat = record.lat,
                    lng = record.lng,
                    "skipping point with non-finite coordinates"
                );
                skipped += 1;
                continue;
            }

            if atlas.name_to_id.contains_key(&record.name) {
                return Err(Error::DuplicatePointName {
                    name: record.name.clone(),
                });
            }

            let id = atlas.points.len() as PointId;
            atlas.name_to_id.insert(record.name.clone(), id);
            atlas.points.insert(
                id,
                Point {
                    id,
                    name: record.name.clone(),
                    position,
                },
            );
        }

        let report = LoadReport {
            loaded: atlas.points.len(),
            skipped,
        };
        debug!(loaded = report.loaded, skipped = report.skipped, "atlas built");
        Ok((atlas, report))
    }

    /// Lookup a point identifier by its case-sensitive name.
    pub fn point_id_by_name(&self, name: &str) -> Option<PointId> {
        self.name_to_id.get(name).copied()
    }

    /// Lookup a point name by identifier.
    pub fn point_name(&self, id: PointId) -> Option<&str> {
        self.points.get(&id).map(|point| point.name.as_str())
    }

    /// Lookup coordinates by identifier.
    pub fn position(&self, id: PointId) -> Option<Coordinates> {
        self.points.get(&id).map(|point| point.position)
    }

    /// Number of points in the atlas.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point names similar to `name`, best match first, at most `limit`.
    ///
    /// Used to enrich `UnknownPoint` errors with "did you mean" hints.
    pub fn fuzzy_point_matches(&self, name: &str, limit: usize) -> Vec<String> {
        const MIN_SIMILARITY: f64 = 0.72;

        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .name_to_id
            .keys()
            .filter_map(|candidate| {
                let score = strsim::jaro_winkler(&needle, &candidate.to_lowercase());
                (score >= MIN_SIMILARITY).then_some((score, candidate.as_str()))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }

    /// Resolve a name to an id, producing an `UnknownPoint` error with
    /// suggestions on failure.
    pub fn resolve(&self, name: &str) -> Result<PointId> {
        self.point_id_by_name(name).ok_or_else(|| {
            let suggestions = self.fuzzy_point_matches(name, 3);
            Error::UnknownPoint {
                name: name.to_string(),
                suggestions,
            }
        })
    }
}

/// Read a point dataset from a JSON file containing an array of records.
pub fn load_points(path: &Path) -> Result<Vec<PointRecord>> {
    if !path.exists() {
        return Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let records: Vec<PointRecord> = serde_json::from_str(&contents)?;
    Ok(records)
}
