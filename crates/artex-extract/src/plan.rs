//! Placement of terminal matches in the output tree.

use artex_rules::ArtifactRule;
use artex_source::FsNode;

/// The anchor used to rebase a terminal match: the rule's declared anchor,
/// or the matched node's own name, case-folded.
pub fn resolve_anchor(rule: &ArtifactRule, node_name: &str) -> String {
    rule.anchor_name()
        .unwrap_or_else(|| node_name.to_uppercase())
}

/// Suffix of `path` starting at the last case-insensitive occurrence of
/// `anchor`. When the anchor never occurs, only the leaf is kept.
pub fn relative_path<'a, S: AsRef<str>>(path: &'a [S], anchor: &str) -> &'a [S] {
    let anchor = anchor.to_uppercase();
    match path
        .iter()
        .rposition(|segment| segment.as_ref().to_uppercase() == anchor)
    {
        Some(start) => &path[start..],
        None => &path[path.len().saturating_sub(1)..],
    }
}

/// Children of an allow-listed directory to extract; `names` must already
/// be case-folded.
pub fn allow_listed<N: FsNode>(children: Vec<N>, names: &[String]) -> Vec<N> {
    children
        .into_iter()
        .filter(|child| {
            let name = child.name().to_uppercase();
            names.iter().any(|n| *n == name)
        })
        .collect()
}
