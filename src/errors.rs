use std::path::PathBuf;
use thiserror::Error;

pub type DatasetResult<T> = Result<T, DatasetError>;

/// Fatal errors raised while configuring or parsing a dataset.
///
/// Per-line problems that only drop a line's contribution (missing image,
/// degenerate box) are logged instead and never surface here.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Validation(String),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed annotation at {path}:{line_no}: {reason}")]
    MalformedLine {
        path: PathBuf,
        line_no: usize,
        reason: String,
    },
    #[error("no dataset registered under the name {0:?}")]
    UnknownDataset(String),
    #[error("failed to parse dataset config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to write records: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }
}
