use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::report::{CategoryReport, Report, ReportEntry};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEntry {
    Success,
    Failure { reason: String },
}

impl LedgerEntry {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Outcome of every path touched during a run, per category.
///
/// Keyed by path so repeated matches of the same node collapse into one
/// entry. A failure replaces an earlier success for the same path; a later
/// success never hides a failure.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    categories: IndexMap<String, IndexMap<String, LedgerEntry>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `category` appear in reports even if nothing is ever recorded.
    pub fn ensure_category(&mut self, category: &str) {
        if !self.categories.contains_key(category) {
            self.categories.insert(category.to_string(), IndexMap::new());
        }
    }

    /// Returns `false` when the path was already recorded.
    pub fn record_success(&mut self, category: &str, path: &str) -> bool {
        let entries = self.entries_mut(category);
        if entries.contains_key(path) {
            return false;
        }
        debug!(category, path, "extracted");
        entries.insert(path.to_string(), LedgerEntry::Success);
        true
    }

    /// Returns `false` when the path already holds a failure; the first
    /// reason is kept.
    pub fn record_failure(&mut self, category: &str, path: &str, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        let entries = self.entries_mut(category);
        match entries.get(path) {
            Some(LedgerEntry::Failure { .. }) => false,
            _ => {
                warn!(category, path, %reason, "extraction failed");
                entries.insert(path.to_string(), LedgerEntry::Failure { reason });
                true
            }
        }
    }

    pub fn get(&self, category: &str, path: &str) -> Option<&LedgerEntry> {
        self.categories.get(category)?.get(path)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn entries(&self, category: &str) -> impl Iterator<Item = (&str, &LedgerEntry)> {
        self.categories
            .get(category)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(p, e)| (p.as_str(), e)))
    }

    pub fn succeeded(&self, category: &str) -> usize {
        self.entries(category).filter(|(_, e)| e.is_success()).count()
    }

    pub fn failed(&self, category: &str) -> usize {
        self.entries(category).filter(|(_, e)| !e.is_success()).count()
    }

    pub fn total_succeeded(&self) -> usize {
        self.categories().map(|c| self.succeeded(c)).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.categories().map(|c| self.failed(c)).sum()
    }

    /// Finalize into a report: categories by name, and within each one,
    /// successes before failures, each sorted by path.
    pub fn report(&self) -> Report {
        let mut categories: Vec<CategoryReport> = self
            .categories
            .iter()
            .map(|(name, entries)| {
                let mut succeeded: Vec<ReportEntry> = Vec::new();
                let mut failed: Vec<ReportEntry> = Vec::new();
                for (path, entry) in entries {
                    match entry {
                        LedgerEntry::Success => succeeded.push(ReportEntry::success(path)),
                        LedgerEntry::Failure { reason } => {
                            failed.push(ReportEntry::failure(path, reason))
                        }
                    }
                }
                succeeded.sort_by(|a, b| a.path.cmp(&b.path));
                failed.sort_by(|a, b| a.path.cmp(&b.path));
                CategoryReport::new(name, succeeded, failed)
            })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Report::new(categories)
    }

    pub fn into_report(self) -> Report {
        self.report()
    }

    fn entries_mut(&mut self, category: &str) -> &mut IndexMap<String, LedgerEntry> {
        self.categories.entry(category.to_string()).or_default()
    }
}
