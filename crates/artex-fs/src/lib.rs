//! Output-side filesystem primitives.
//!
//! Everything that touches the local output tree goes through here:
//! directory creation, bounded-chunk stream copies from a source reader,
//! and atomic writes for report files.

mod error;
mod primitives;

pub use error::{Error, Result};
pub use primitives::{
    AtomicWriteOptions, CopyOptions, DEFAULT_CHUNK_SIZE, atomic_write, copy_stream, ensure_dir,
    ensure_parent,
};
