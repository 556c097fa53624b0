use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Create `path` and any missing ancestors. Existing directories are fine.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| Error::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Create the parent directory of `path`, if it has one.
pub fn ensure_parent(path: impl AsRef<Path>) -> Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_over_file_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("blocker");
        fs::write(&file, b"x").unwrap();
        let err = ensure_dir(file.join("child")).unwrap_err();
        assert!(matches!(err, Error::CreateDir { .. }));
    }

    #[test]
    fn test_ensure_parent_relative_leaf() {
        ensure_parent("leaf.txt").unwrap();
    }
}
