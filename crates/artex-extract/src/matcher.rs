//! Per-segment matching of child names.
//!
//! A template segment is one of three shapes:
//!
//! - `*` matches every child.
//! - A segment containing `*` elsewhere is a glob; each `*` run stands for
//!   any character sequence and the whole name must match, ignoring case.
//! - Anything else is an exact name. A case-sensitive hit wins; otherwise
//!   the first case-insensitive hit is taken. Exact segments select at
//!   most one child.
//!
//! `.` and `..` never match.

use artex_rules::PathTemplate;
use artex_source::{FsNode, is_pseudo_entry};
use regex::Regex;

use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub enum Segment {
    Any,
    Glob { pattern: String, regex: Regex },
    Exact(String),
}

impl Segment {
    pub fn compile(segment: &str) -> Result<Self> {
        if segment == "*" {
            return Ok(Self::Any);
        }
        if !segment.contains('*') {
            return Ok(Self::Exact(segment.to_string()));
        }

        let body = segment
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("(?i)^{body}$")).map_err(|source| {
            Error::InvalidSegment {
                segment: segment.to_string(),
                source,
            }
        })?;

        Ok(Self::Glob {
            pattern: segment.to_string(),
            regex,
        })
    }

    pub fn compile_template(template: &PathTemplate) -> Result<Vec<Self>> {
        template.segments().iter().map(|s| Self::compile(s)).collect()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => "*",
            Self::Glob { pattern, .. } => pattern,
            Self::Exact(name) => name,
        }
    }
}

/// Indices of `names` selected by `segment`, in input order.
pub fn matching_indices<S: AsRef<str>>(segment: &Segment, names: &[S]) -> Vec<usize> {
    let candidates = names
        .iter()
        .enumerate()
        .map(|(i, n)| (i, n.as_ref()))
        .filter(|(_, n)| !is_pseudo_entry(n));

    match segment {
        Segment::Any => candidates.map(|(i, _)| i).collect(),
        Segment::Glob { regex, .. } => candidates
            .filter(|(_, n)| regex.is_match(n))
            .map(|(i, _)| i)
            .collect(),
        Segment::Exact(wanted) => {
            let candidates: Vec<_> = candidates.collect();
            let exact = candidates.iter().find(|(_, n)| *n == wanted.as_str());
            let folded = || {
                let wanted = wanted.to_uppercase();
                candidates.iter().find(|(_, n)| n.to_uppercase() == wanted)
            };
            exact.or_else(folded).map(|(i, _)| *i).into_iter().collect()
        }
    }
}

/// Children selected by `segment`, preserving enumeration order.
pub fn select<N: FsNode>(segment: &Segment, children: Vec<N>) -> Vec<N> {
    let mut keep = vec![false; children.len()];
    {
        let names: Vec<&str> = children.iter().map(|c| c.name()).collect();
        for i in matching_indices(segment, &names) {
            keep[i] = true;
        }
    }
    children
        .into_iter()
        .zip(keep)
        .filter_map(|(child, keep)| keep.then_some(child))
        .collect()
}
