use crate::{Error, Result};
use std::io::Write;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicWriteOptions {
    pub sync: bool,
}

impl AtomicWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Write `content` to a sibling temp file, then rename it over `path`.
pub fn atomic_write(
    path: impl AsRef<Path>,
    content: &[u8],
    options: AtomicWriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".artex-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

    tmp.write_all(content).map_err(|e| Error::Write {
        path: tmp.path().to_path_buf(),
        source: e,
    })?;

    if options.sync {
        tmp.as_file().sync_all().map_err(|e| Error::Write {
            path: tmp.path().to_path_buf(),
            source: e,
        })?;
    }

    tmp.persist(path).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        atomic_write(&path, b"hello world", AtomicWriteOptions::new()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "old").unwrap();
        atomic_write(&path, b"new", AtomicWriteOptions::new().sync(true)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        atomic_write(dir.path().join("a.json"), b"{}", AtomicWriteOptions::new()).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("a.json")]);
    }
}
