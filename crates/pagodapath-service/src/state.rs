//! Application state shared by all axum handlers.

use std::path::Path;
use std::sync::Arc;

use pagodapath_lib::{load_points, Error as LibError, GraphOptions, Pathfinder, PointRecord};

/// Shared application state, cheaply cloneable via the inner `Arc`.
#[derive(Clone)]
pub struct AppState {
    pathfinder: Arc<Pathfinder>,
}

impl AppState {
    /// Load application state from a JSON point dataset file.
    pub fn load(data_path: impl AsRef<Path>, options: GraphOptions) -> Result<Self, LibError> {
        let data_path = data_path.as_ref();

        tracing::info!(path = %data_path.display(), "loading point dataset");
        let records = load_points(data_path)?;
        let state = Self::from_records(&records, options)?;
        tracing::info!(
            points = state.pathfinder().point_count(),
            "point dataset loaded"
        );
        Ok(state)
    }

    /// Create application state from in-memory records, used by tests.
    pub fn from_records(records: &[PointRecord], options: GraphOptions) -> Result<Self, LibError> {
        let pathfinder = Pathfinder::with_options(options);
        let report = pathfinder.load_points(records)?;
        if report.skipped > 0 {
            tracing::warn!(skipped = report.skipped, "dataset contained invalid points");
        }
        Ok(Self {
            pathfinder: Arc::new(pathfinder),
        })
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("point_count", &self.pathfinder.point_count())
            .finish()
    }
}
