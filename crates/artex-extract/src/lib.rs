//! Pattern-matching artifact extraction.
//!
//! # Architecture
//!
//! - `matcher.rs` - segment matchers (`*`, embedded globs, exact names)
//! - `walk.rs` - recursive descent of a compiled template over `FsNode`s
//! - `plan.rs` - anchor resolution and allow-list filtering
//! - `copy.rs` - byte and subtree copies into the output tree
//! - `sanitize.rs` - output path construction that cannot leave its base
//! - `ledger.rs` - deduplicating per-category outcome record
//! - `report.rs` - finalized, sorted view of the ledger
//! - `extract.rs` - `Extractor`, the per-run context tying it together

pub use error::{Error, Result};
pub use extract::{CategoryOutcome, Extractor, RuleOutcome, extract_image};
pub use ledger::{Ledger, LedgerEntry};
pub use matcher::Segment;
pub use options::{ExtractOptions, Progress};
pub use path::MatchPath;
pub use report::{CategoryReport, Report, ReportEntry, Status};

mod copy;
mod error;
mod extract;
pub mod ledger;
pub mod matcher;
pub mod options;
mod path;
pub mod plan;
pub mod report;
mod sanitize;
mod walk;
