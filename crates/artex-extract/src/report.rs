use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub status: Status,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReportEntry {
    pub fn success(path: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            path: path.into(),
            reason: None,
        }
    }

    pub fn failure(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: Status::Failure,
            path: path.into(),
            reason: Some(reason.into()),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CategoryReport {
    pub name: String,
    pub succeeded: usize,
    pub failed: usize,
    pub entries: Vec<ReportEntry>,
}

impl CategoryReport {
    pub(crate) fn new(name: &str, succeeded: Vec<ReportEntry>, failed: Vec<ReportEntry>) -> Self {
        let (ok, bad) = (succeeded.len(), failed.len());
        let mut entries = succeeded;
        entries.extend(failed);
        Self {
            name: name.to_string(),
            succeeded: ok,
            failed: bad,
            entries,
        }
    }

    pub fn successes(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.status == Status::Success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.status == Status::Failure)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub succeeded: usize,
    pub failed: usize,
    pub categories: Vec<CategoryReport>,
}

impl Report {
    pub(crate) fn new(categories: Vec<CategoryReport>) -> Self {
        Self {
            succeeded: categories.iter().map(|c| c.succeeded).sum(),
            failed: categories.iter().map(|c| c.failed).sum(),
            categories,
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded == 0 && self.failed == 0
    }
}
