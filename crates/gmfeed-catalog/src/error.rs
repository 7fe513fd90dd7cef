use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read catalog snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML catalog snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON catalog snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported catalog snapshot format for {path}: expected .yaml, .yml or .json")]
    UnsupportedFormat { path: PathBuf },

    #[error("catalog snapshot failed validation: {0}")]
    Validation(String),
}
