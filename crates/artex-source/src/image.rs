//! Image-access providers.
//!
//! A provider hands the engine a root node and nothing else. Reading raw
//! container formats is somebody else's job; [`MountedImage`] expects the
//! image to be mounted already and only locates the OS volume inside the
//! mount, probing partition directories the way a multi-partition mount
//! lays them out (`p1`, `p2`, ...).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::local::LocalNode;
use crate::memory::MemoryNode;
use crate::node::FsNode;

pub trait ImageProvider {
    type Node: FsNode;

    fn open_root(&self) -> Result<Self::Node>;
}

const DEFAULT_VOLUME_MARKER: &str = "Windows";
const DEFAULT_MAX_PARTITIONS: usize = 10;

#[derive(Clone, Debug)]
pub struct MountedImage {
    mount: PathBuf,
    volume_marker: Option<String>,
    max_partitions: usize,
}

impl MountedImage {
    pub fn new(mount: impl AsRef<Path>) -> Self {
        Self {
            mount: mount.as_ref().to_path_buf(),
            volume_marker: Some(DEFAULT_VOLUME_MARKER.to_string()),
            max_partitions: DEFAULT_MAX_PARTITIONS,
        }
    }

    /// Directory whose presence marks the volume to extract from.
    /// `None` accepts the mount root as-is.
    pub fn volume_marker(mut self, marker: Option<String>) -> Self {
        self.volume_marker = marker;
        self
    }

    pub fn max_partitions(mut self, n: usize) -> Self {
        self.max_partitions = n;
        self
    }

    pub fn mount(&self) -> &Path {
        &self.mount
    }

    /// Mount root first, then `p1..=pN`, then every other child directory
    /// in name order.
    fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = vec![self.mount.clone()];
        for i in 1..=self.max_partitions {
            let partition = self.mount.join(format!("p{i}"));
            if partition.is_dir() {
                candidates.push(partition);
            }
        }

        let mut rest: Vec<PathBuf> = fs::read_dir(&self.mount)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|entry| entry.path())
            .filter(|path| !candidates.contains(path))
            .collect();
        rest.sort();
        candidates.extend(rest);
        candidates
    }

    fn not_found(&self, reason: impl Into<String>) -> Error {
        Error::NoFilesystemFound {
            image: self.mount.clone(),
            reason: reason.into(),
        }
    }
}

fn has_child_dir(node: &LocalNode, name: &str) -> bool {
    node.children()
        .map(|children| {
            children
                .iter()
                .any(|c| c.is_directory() && c.name().eq_ignore_ascii_case(name))
        })
        .unwrap_or(false)
}

impl ImageProvider for MountedImage {
    type Node = LocalNode;

    fn open_root(&self) -> Result<LocalNode> {
        if !self.mount.is_dir() {
            return Err(self.not_found("mount point is not a directory"));
        }

        let Some(marker) = self.volume_marker.as_deref() else {
            return LocalNode::new(&self.mount);
        };

        for candidate in self.candidates() {
            debug!("checking volume candidate {}", candidate.display());
            let Ok(node) = LocalNode::new(&candidate) else {
                continue;
            };
            if node.is_directory() && has_child_dir(&node, marker) {
                info!("found '{marker}' volume at {}", candidate.display());
                return Ok(node);
            }
        }

        Err(self.not_found(format!("no volume contains a '{marker}' directory")))
    }
}

/// Provider over an in-memory tree.
#[derive(Clone, Debug, Default)]
pub struct MemoryImage {
    root: Option<MemoryNode>,
}

impl MemoryImage {
    pub fn new(root: MemoryNode) -> Self {
        Self { root: Some(root) }
    }

    /// An image with no usable filesystem.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl ImageProvider for MemoryImage {
    type Node = MemoryNode;

    fn open_root(&self) -> Result<MemoryNode> {
        self.root.clone().ok_or_else(|| Error::NoFilesystemFound {
            image: PathBuf::from("<memory>"),
            reason: "image holds no filesystem".to_string(),
        })
    }
}
