use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Rules(#[from] artex_rules::Error),

    #[error("invalid segment pattern '{segment}': {source}")]
    InvalidSegment {
        segment: String,
        source: regex::Error,
    },

    #[error(transparent)]
    Source(#[from] artex_source::Error),

    #[error("segment '{segment}' would escape the output directory '{base}'")]
    UnsafeSegment { segment: String, base: PathBuf },
}

impl Error {
    /// The image provider could not supply a root; fatal to the run.
    pub fn is_no_filesystem(&self) -> bool {
        matches!(
            self,
            Self::Source(artex_source::Error::NoFilesystemFound { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
