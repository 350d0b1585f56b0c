use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the pagodapath library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset could not be located at the resolved path.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// Raised when a point name could not be found in the current dataset.
    #[error("unknown point name: {name}{}", format_suggestions(.suggestions))]
    UnknownPoint {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when the input dataset contains the same point name twice.
    #[error("duplicate point name encountered: {name}")]
    DuplicatePointName { name: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
