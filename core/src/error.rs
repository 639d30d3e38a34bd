use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Corpus directory or committed index is missing.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot average an empty list of ranks")]
    EmptyInput,
    #[error("corrupt index: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] bincode::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
