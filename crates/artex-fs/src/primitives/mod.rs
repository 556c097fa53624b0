pub mod atomic_write;
pub mod dir;
pub mod stream;

pub use atomic_write::{AtomicWriteOptions, atomic_write};
pub use dir::{ensure_dir, ensure_parent};
pub use stream::{CopyOptions, DEFAULT_CHUNK_SIZE, copy_stream};
