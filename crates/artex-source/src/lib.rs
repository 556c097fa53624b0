//! Read-only view of an image's filesystem.
//!
//! # Architecture
//!
//! This crate defines the `FsNode` trait - the only contract between the
//! extraction engine and whatever reads the image. The engine walks nodes;
//! providers decide how nodes are backed.
//!
//! - `node.rs` - `FsNode` trait and node kinds
//! - `image.rs` - `ImageProvider` trait and the mounted-image provider
//! - `local.rs` - nodes backed by a host directory (a mounted image)
//! - `memory.rs` - in-memory trees with fault injection

pub use error::{Error, Result};
pub use image::{ImageProvider, MemoryImage, MountedImage};
pub use local::LocalNode;
pub use memory::MemoryNode;
pub use node::{FsNode, NodeKind, is_pseudo_entry};

mod error;
mod image;
mod local;
mod memory;
mod node;
