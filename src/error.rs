use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ProjcatError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ProjcatError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("'{0}' is not a valid directory or repository URL")]
    InvalidInput(String),
    #[error("No project path or repository URL was given")]
    MissingInput,
    #[error("Failed to fetch repository: {0}")]
    RemoteFetch(String),
    #[error("Walk error: {0}")]
    Walk(String),
    #[error("Invalid pattern: {0}")]
    Pattern(String),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjcatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProjcatError::Io {
            path: path.into(),
            source,
        }
    }
}
