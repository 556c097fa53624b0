use std::io::Read;

use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    /// Symlinks, devices, and anything else the engine does not copy.
    Other,
}

/// A node in an image's directory tree.
///
/// Implementations must enumerate children in a stable order; the
/// extraction ledger is only reproducible when enumeration is.
pub trait FsNode: Sized {
    fn name(&self) -> &str;

    fn kind(&self) -> NodeKind;

    fn is_directory(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    fn is_file(&self) -> bool {
        self.kind() == NodeKind::File
    }

    /// Immediate children. May include `.`/`..` pseudo-entries; callers
    /// filter them with [`is_pseudo_entry`].
    fn children(&self) -> Result<Vec<Self>>;

    /// Byte stream over a file node's content.
    fn open(&self) -> Result<Box<dyn Read + '_>>;
}

/// `.` and `..` as reported by some filesystem readers.
pub fn is_pseudo_entry(name: &str) -> bool {
    name == "." || name == ".."
}
