//! Declarative artifact rules.
//!
//! - `template.rs` - path template normalization and `{PARAM}` rendering
//! - `rule.rs` - `ArtifactRule` and `Category`
//! - `catalog.rs` - JSON rule catalog and per-program selection

pub use catalog::{Catalog, Mode, Selection};
pub use error::{Error, Result};
pub use rule::{ArtifactRule, Category, fold_separator};
pub use template::{PathTemplate, TemplateParams, normalize};

pub mod catalog;
mod error;
pub mod rule;
pub mod template;
