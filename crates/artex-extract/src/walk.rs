use artex_source::FsNode;
use tracing::trace;

use crate::extract::RuleRun;
use crate::matcher::{self, Segment};
use crate::path::MatchPath;

/// Outcome of matching one segment against a node's children.
#[derive(Debug)]
pub(crate) enum Descent<N> {
    Matched(Vec<N>),
    NoMatch,
    Failed(artex_source::Error),
}

pub(crate) fn descend<N: FsNode>(node: &N, segment: &Segment) -> Descent<N> {
    if !node.is_directory() {
        return Descent::NoMatch;
    }
    match node.children() {
        Ok(children) => {
            let found = matcher::select(segment, children);
            if found.is_empty() {
                Descent::NoMatch
            } else {
                Descent::Matched(found)
            }
        }
        Err(e) => Descent::Failed(e),
    }
}

impl RuleRun<'_> {
    pub(crate) fn walk<N: FsNode>(&mut self, node: &N, segments: &[Segment], path: &MatchPath) {
        let Some((segment, rest)) = segments.split_first() else {
            self.place(node, path);
            return;
        };

        match descend(node, segment) {
            Descent::Matched(children) => {
                for child in &children {
                    self.walk(child, rest, &path.child(child.name()));
                }
            }
            Descent::NoMatch => {
                trace!(path = %path, segment = segment.as_str(), "no match");
            }
            Descent::Failed(e) => {
                self.fail(path, format!("could not read directory: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use artex_source::MemoryNode;

    use super::*;

    fn names(descent: Descent<MemoryNode>) -> Vec<String> {
        match descent {
            Descent::Matched(nodes) => nodes.iter().map(|n| n.name().to_string()).collect(),
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn wildcard_over_n_children_yields_n() {
        let dir = MemoryNode::dir(
            "Users",
            vec![
                MemoryNode::dir("alice", vec![]),
                MemoryNode::dir("bob", vec![]),
                MemoryNode::file("desktop.ini", b""),
            ],
        );
        let any = Segment::compile("*").unwrap();
        assert_eq!(names(descend(&dir, &any)), ["alice", "bob", "desktop.ini"]);
    }

    #[test]
    fn file_is_a_dead_end() {
        let file = MemoryNode::file("B.txt", b"x");
        let any = Segment::compile("*").unwrap();
        assert!(matches!(descend(&file, &any), Descent::NoMatch));
    }

    #[test]
    fn no_candidates_is_not_a_failure() {
        let dir = MemoryNode::dir("y", vec![]);
        let exact = Segment::compile("B.TXT").unwrap();
        assert!(matches!(descend(&dir, &exact), Descent::NoMatch));
    }

    #[test]
    fn enumeration_error_is_failed() {
        let dir = MemoryNode::unreadable_dir("bad", "sector read error");
        let any = Segment::compile("*").unwrap();
        assert!(matches!(descend(&dir, &any), Descent::Failed(_)));
    }

    #[test]
    fn exact_returns_one_of_case_variants() {
        let dir = MemoryNode::dir(
            "d",
            vec![MemoryNode::file("readme", b""), MemoryNode::file("README", b"")],
        );
        let exact = Segment::compile("README").unwrap();
        assert_eq!(names(descend(&dir, &exact)), ["README"]);
    }
}
