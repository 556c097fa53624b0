use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("template '{template}' uses unbound parameter '{{{name}}}'")]
    UnboundParameter { template: String, name: String },

    #[error("no rules defined for '{program}' and no heuristic set '{heuristic}'")]
    UnknownProgram { program: String, heuristic: String },

    #[error("catalog defines '{program}' more than once (keys differ only in case)")]
    DuplicateProgram { program: String },

    #[error("unknown mode '{0}', expected 'api' or 'standalone'")]
    UnknownMode(String),

    #[error("failed to read catalog '{path}': {source}")]
    CatalogRead { path: PathBuf, source: io::Error },

    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
