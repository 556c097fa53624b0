//! Run context for an extraction.
//!
//! An `Extractor` owns the ledger for one run. Each rule is executed by a
//! short-lived `RuleRun` that borrows the ledger and carries the rule's
//! placement settings; the walker, planner, and copier are its methods and
//! only touch shared state through `succeed` and `fail`.

use std::path::{Path, PathBuf};

use artex_rules::{ArtifactRule, Category};
use artex_source::{FsNode, ImageProvider};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::ledger::Ledger;
use crate::matcher::Segment;
use crate::options::ExtractOptions;
use crate::path::MatchPath;
use crate::plan;
use crate::report::Report;

/// What one rule produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Terminal matches and the descendants copied under them, whatever
    /// the result.
    pub matched: usize,
    pub files_copied: usize,
    pub copied_bytes: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryOutcome {
    pub name: String,
    pub rules: Vec<RuleOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

impl CategoryOutcome {
    pub fn matched(&self) -> usize {
        self.rules.iter().map(|r| r.matched).sum()
    }

    pub fn copied_bytes(&self) -> u64 {
        self.rules.iter().map(|r| r.copied_bytes).sum()
    }
}

pub struct Extractor {
    output_root: PathBuf,
    options: ExtractOptions,
    ledger: Ledger,
}

impl Extractor {
    pub fn new(output_root: impl AsRef<Path>, options: ExtractOptions) -> Self {
        Self {
            output_root: output_root.as_ref().to_path_buf(),
            options,
            ledger: Ledger::new(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Ledger key and on-disk directory name for `category`.
    pub fn category_key(&self, category: &Category) -> String {
        category.key(self.options.fold_separator)
    }

    pub fn category_dir(&self, category: &Category) -> PathBuf {
        self.output_root.join(self.category_key(category))
    }

    /// Run one rule against `root`.
    ///
    /// Node-level failures land in the ledger; only a rule that cannot be
    /// compiled is returned as an error.
    pub fn extract_rule<N: FsNode>(
        &mut self,
        root: &N,
        category: &Category,
        rule: &ArtifactRule,
    ) -> Result<RuleOutcome> {
        let template = rule.path_template()?;
        let segments = Segment::compile_template(&template)?;
        debug!(template = %template, "walking rule");

        let key = self.category_key(category);
        let category_dir = self.output_root.join(&key);
        let mut run = RuleRun {
            ledger: &mut self.ledger,
            options: &self.options,
            category: &key,
            category_dir: &category_dir,
            rule,
            outcome: RuleOutcome::default(),
        };
        run.walk(root, &segments, &MatchPath::root());
        Ok(run.outcome)
    }

    /// Run every rule of `category` in order. A rule that fails to compile
    /// is recorded under its raw template and the rest still run.
    pub fn extract_category<N: FsNode>(&mut self, root: &N, category: &Category) -> CategoryOutcome {
        let key = self.category_key(category);
        self.ledger.ensure_category(&key);

        let mut rules = Vec::with_capacity(category.rules.len());
        for rule in &category.rules {
            match self.extract_rule(root, category, rule) {
                Ok(outcome) => rules.push(outcome),
                Err(e) => {
                    warn!(template = %rule.template, error = %e, "skipping rule");
                    self.ledger
                        .record_failure(&key, &rule.template, format!("invalid rule: {e}"));
                    rules.push(RuleOutcome::default());
                }
            }
        }

        let outcome = CategoryOutcome {
            succeeded: self.ledger.succeeded(&key),
            failed: self.ledger.failed(&key),
            name: key,
            rules,
        };
        info!(
            category = %outcome.name,
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "category done"
        );
        outcome
    }

    pub fn extract_all<N: FsNode>(&mut self, root: &N, categories: &[Category]) -> Vec<CategoryOutcome> {
        categories
            .iter()
            .map(|category| self.extract_category(root, category))
            .collect()
    }

    pub fn report(&self) -> Report {
        self.ledger.report()
    }

    pub fn into_report(self) -> Report {
        self.ledger.into_report()
    }
}

/// Open the provider's root and run every category against it.
///
/// Failing to obtain a root is the only error; everything after that is
/// reported through the ledger.
pub fn extract_image<P: ImageProvider>(
    provider: &P,
    categories: &[Category],
    output_root: impl AsRef<Path>,
    options: ExtractOptions,
) -> Result<Report> {
    let root = provider.open_root()?;
    let mut extractor = Extractor::new(output_root, options);
    extractor.extract_all(&root, categories);
    Ok(extractor.into_report())
}

/// Per-rule state threaded through the walker, planner, and copier.
pub(crate) struct RuleRun<'a> {
    ledger: &'a mut Ledger,
    pub(crate) options: &'a ExtractOptions,
    pub(crate) category: &'a str,
    pub(crate) category_dir: &'a Path,
    rule: &'a ArtifactRule,
    pub(crate) outcome: RuleOutcome,
}

impl RuleRun<'_> {
    /// Planner entry point for a terminal match.
    pub(crate) fn place<N: FsNode>(&mut self, node: &N, path: &MatchPath) {
        match self.rule.allowed_names() {
            Some(names) if node.is_directory() => self.place_allow_listed(node, path, &names),
            _ => {
                let anchor = plan::resolve_anchor(self.rule, node.name());
                self.extract(node, path, &anchor);
            }
        }
    }

    fn place_allow_listed<N: FsNode>(&mut self, node: &N, path: &MatchPath, names: &[String]) {
        let children = match node.children() {
            Ok(children) => children,
            Err(e) => {
                self.fail(path, format!("failed to list items in directory: {e}"));
                return;
            }
        };

        for child in plan::allow_listed(children, names) {
            let anchor = child.name().to_uppercase();
            self.extract(&child, &path.child(child.name()), &anchor);
        }
    }

    pub(crate) fn succeed(&mut self, path: &MatchPath) {
        self.ledger.record_success(self.category, &path.to_string());
    }

    pub(crate) fn fail(&mut self, path: &MatchPath, reason: String) {
        self.ledger
            .record_failure(self.category, &path.to_string(), reason);
    }
}
