use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by corpus loading, selection and the session engine
#[derive(Debug, Error)]
pub enum TrainerError {
    /// No readable dataset was found at any of the searched locations
    #[error("tongue twister dataset not found (searched: {searched})")]
    DatasetUnavailable { searched: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// A requested band or category has no items left to pick from
    #[error("no tongue twisters available for {0}")]
    EmptyPool(String),

    #[error("no round is waiting for a rating")]
    NoPendingRound,
}

pub type Result<T> = std::result::Result<T, TrainerError>;
