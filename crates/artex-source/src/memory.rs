use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::node::{FsNode, NodeKind};

/// An in-memory node. Cloning is cheap; content and children are shared.
///
/// Besides plain files and directories, a tree can carry nodes that fail
/// on access, which is how enumeration and read failures are reproduced
/// without a damaged image at hand.
#[derive(Clone, Debug)]
pub struct MemoryNode {
    name: String,
    body: Body,
}

#[derive(Clone, Debug)]
enum Body {
    File(Arc<[u8]>),
    Dir(Arc<Vec<MemoryNode>>),
    UnreadableDir(Arc<str>),
    UnreadableFile(Arc<str>),
    Link,
}

impl MemoryNode {
    pub fn file(name: impl Into<String>, content: impl AsRef<[u8]>) -> Self {
        Self {
            name: name.into(),
            body: Body::File(Arc::from(content.as_ref())),
        }
    }

    pub fn dir(name: impl Into<String>, children: Vec<MemoryNode>) -> Self {
        Self {
            name: name.into(),
            body: Body::Dir(Arc::new(children)),
        }
    }

    /// Root of a tree; the name is empty, as a volume root has none.
    pub fn root(children: Vec<MemoryNode>) -> Self {
        Self::dir("", children)
    }

    /// A directory whose enumeration always fails with `reason`.
    pub fn unreadable_dir(name: impl Into<String>, reason: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            body: Body::UnreadableDir(Arc::from(reason.as_ref())),
        }
    }

    /// A file whose stream can never be opened.
    pub fn unreadable_file(name: impl Into<String>, reason: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            body: Body::UnreadableFile(Arc::from(reason.as_ref())),
        }
    }

    /// A node that is neither file nor directory.
    pub fn link(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Body::Link,
        }
    }
}

impl FsNode for MemoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        match self.body {
            Body::File(_) | Body::UnreadableFile(_) => NodeKind::File,
            Body::Dir(_) | Body::UnreadableDir(_) => NodeKind::Directory,
            Body::Link => NodeKind::Other,
        }
    }

    fn children(&self) -> Result<Vec<Self>> {
        match &self.body {
            Body::Dir(children) => Ok(children.as_ref().clone()),
            Body::UnreadableDir(reason) => Err(Error::Unreadable {
                name: self.name.clone(),
                reason: reason.to_string(),
            }),
            _ => Err(Error::NotADirectory {
                name: self.name.clone(),
            }),
        }
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        match &self.body {
            Body::File(content) => Ok(Box::new(Cursor::new(&content[..]))),
            Body::UnreadableFile(reason) => Err(Error::Unreadable {
                name: self.name.clone(),
                reason: reason.to_string(),
            }),
            _ => Err(Error::NotAFile {
                name: self.name.clone(),
            }),
        }
    }
}
