use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};
use crate::node::{FsNode, NodeKind};

/// A node backed by a path on the host, typically inside a mounted image.
///
/// Symlinks are reported as [`NodeKind::Other`] and never followed, so a
/// link inside the image cannot point the walk back out onto the host.
#[derive(Clone, Debug)]
pub struct LocalNode {
    path: PathBuf,
    name: String,
    kind: NodeKind,
}

impl LocalNode {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::symlink_metadata(path).map_err(|e| Error::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            name,
            kind: kind_of(meta.file_type()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn kind_of(file_type: fs::FileType) -> NodeKind {
    if file_type.is_dir() {
        NodeKind::Directory
    } else if file_type.is_file() {
        NodeKind::File
    } else {
        NodeKind::Other
    }
}

/// One bad entry costs only itself: it is skipped, and an entry whose type
/// cannot be read is kept as [`NodeKind::Other`].
fn child_from_entry(dir: &Path, entry: io::Result<fs::DirEntry>) -> Option<LocalNode> {
    let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
            return None;
        }
    };
    let kind = match entry.file_type() {
        Ok(file_type) => kind_of(file_type),
        Err(e) => {
            warn!(path = %entry.path().display(), error = %e, "could not read entry type");
            NodeKind::Other
        }
    };
    Some(LocalNode {
        path: entry.path(),
        name: entry.file_name().to_string_lossy().into_owned(),
        kind,
    })
}

impl FsNode for LocalNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn children(&self) -> Result<Vec<Self>> {
        if self.kind != NodeKind::Directory {
            return Err(Error::NotADirectory {
                name: self.name.clone(),
            });
        }

        let entries = fs::read_dir(&self.path).map_err(|e| Error::ReadDir {
            path: self.path.clone(),
            source: e,
        })?;
        let mut children: Vec<Self> = entries
            .filter_map(|entry| child_from_entry(&self.path, entry))
            .collect();
        // read_dir order is platform-dependent
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        if self.kind != NodeKind::File {
            return Err(Error::NotAFile {
                name: self.name.clone(),
            });
        }
        let file = fs::File::open(&self.path).map_err(|e| Error::Open {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn children_are_sorted() {
        let dir = tempdir().unwrap();
        for name in ["zeta", "Alpha", "mid"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();

        let root = LocalNode::new(dir.path()).unwrap();
        let names: Vec<_> = root
            .children()
            .unwrap()
            .into_iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, ["Alpha", "mid", "sub", "zeta"]);
    }

    #[test]
    fn open_reads_content() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("file.txt"), "payload").unwrap();

        let node = LocalNode::new(dir.path().join("file.txt")).unwrap();
        assert!(node.is_file());
        let mut content = String::new();
        node.open().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "payload");
    }

    #[test]
    fn bad_entry_is_skipped() {
        let dir = tempdir().unwrap();
        let bad = Err(io::Error::other("corrupt entry"));
        assert!(child_from_entry(dir.path(), bad).is_none());
    }

    #[test]
    fn good_entry_becomes_child() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Users")).unwrap();
        let entry = fs::read_dir(dir.path()).unwrap().next().unwrap();
        let child = child_from_entry(dir.path(), entry).unwrap();
        assert_eq!(child.name(), "Users");
        assert!(child.is_directory());
    }

    #[test]
    fn children_of_file_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("file.txt"), "x").unwrap();
        let node = LocalNode::new(dir.path().join("file.txt")).unwrap();
        assert!(matches!(node.children(), Err(Error::NotADirectory { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink("/etc", dir.path().join("escape")).unwrap();
        let root = LocalNode::new(dir.path()).unwrap();
        let children = root.children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), NodeKind::Other);
    }
}
