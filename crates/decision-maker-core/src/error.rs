use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Malformed file {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
