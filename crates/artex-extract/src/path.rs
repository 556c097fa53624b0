use std::fmt;

/// Concrete segment names walked from the image root to a node.
///
/// Displays as `/Users/bob/AppData`; the root is `/`. The display form is
/// the ledger key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MatchPath {
    segments: Vec<String>,
}

impl MatchPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(name.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl<S: Into<String>> FromIterator<S> for MatchPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for MatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
