//! Error types for image access.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read directory '{path}': {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("could not open '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("'{name}' is unreadable: {reason}")]
    Unreadable { name: String, reason: String },

    #[error("'{name}' is not a directory")]
    NotADirectory { name: String },

    #[error("'{name}' is not a regular file")]
    NotAFile { name: String },

    #[error("no usable filesystem found in '{image}': {reason}")]
    NoFilesystemFound { image: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
