use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::template::{PathTemplate, TemplateParams};

/// One path template plus how matches are rebased into the output tree.
///
/// `allow_list` only applies when the template resolves to a directory;
/// otherwise the anchor decides placement. With neither set, the matched
/// node's own name is the anchor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRule {
    #[serde(rename = "path")]
    pub template: String,

    #[serde(rename = "extract_from", default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    #[serde(rename = "extract_files", default, skip_serializing_if = "Option::is_none")]
    pub allow_list: Option<Vec<String>>,
}

impl ArtifactRule {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            anchor: None,
            allow_list: None,
        }
    }

    pub fn anchored(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn allow<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Resolve `{PARAM}` placeholders in the template and anchor.
    pub fn instantiate(&self, params: &TemplateParams) -> Result<Self> {
        Ok(Self {
            template: params.render(&self.template)?,
            anchor: self
                .anchor
                .as_deref()
                .map(|a| params.render(a))
                .transpose()?,
            allow_list: self.allow_list.clone(),
        })
    }

    /// Parse the template. Placeholders left unresolved are rejected here,
    /// so an uninstantiated rule fails on its own instead of matching a
    /// literal `{NAME}` segment.
    pub fn path_template(&self) -> Result<PathTemplate> {
        let rendered = TemplateParams::new().render(&self.template)?;
        PathTemplate::parse(&rendered)
    }

    /// The declared anchor, case-folded, keeping only its last component.
    /// An anchor that folds to nothing counts as absent.
    pub fn anchor_name(&self) -> Option<String> {
        let anchor = self.anchor.as_deref()?.replace('\\', "/").to_uppercase();
        let last = anchor.rsplit('/').next().unwrap_or_default();
        (!last.is_empty()).then(|| last.to_string())
    }

    /// Allow-listed names, case-folded.
    pub fn allowed_names(&self) -> Option<Vec<String>> {
        self.allow_list
            .as_ref()
            .map(|names| names.iter().map(|n| n.to_uppercase()).collect())
    }
}

/// A named, ordered group of rules. Names may contain `+`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub rules: Vec<ArtifactRule>,
}

impl Category {
    pub fn new(name: impl Into<String>, rules: Vec<ArtifactRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Name used on disk and in the ledger.
    pub fn key(&self, fold: bool) -> String {
        if fold {
            fold_separator(&self.name)
        } else {
            self.name.clone()
        }
    }
}

/// `+` to `_`, for filesystems and tools that dislike `+`.
pub fn fold_separator(name: &str) -> String {
    name.replace('+', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn deserializes_catalog_shape() {
        let rule: ArtifactRule = serde_json::from_str(
            r#"{"path": "C:\\Users\\*\\AppData\\Roaming\\Claude\\Network", "extract_files": ["Cookies"]}"#,
        )
        .unwrap();
        assert_eq!(rule.anchor, None);
        assert_eq!(rule.allow_list.as_deref(), Some(&["Cookies".to_string()][..]));
    }

    #[test]
    fn anchor_name_takes_last_component() {
        let rule = ArtifactRule::new(r"C:\A").anchored(r"Roaming\Claude");
        assert_eq!(rule.anchor_name().as_deref(), Some("CLAUDE"));

        let rule = ArtifactRule::new(r"C:\A").anchored("cache_data");
        assert_eq!(rule.anchor_name().as_deref(), Some("CACHE_DATA"));

        assert_eq!(ArtifactRule::new(r"C:\A").anchored("x/").anchor_name(), None);
        assert_eq!(ArtifactRule::new(r"C:\A").anchor_name(), None);
    }

    #[test]
    fn instantiate_renders_template_and_anchor() {
        let rule = ArtifactRule::new(r"C:\Users\*\AppData\Roaming\{LLM_NAME}").anchored("{LLM_NAME}");
        let rule = rule.instantiate(&TemplateParams::for_program("OLLAMA")).unwrap();
        assert_eq!(rule.template, r"C:\Users\*\AppData\Roaming\OLLAMA");
        assert_eq!(rule.anchor.as_deref(), Some("OLLAMA"));
    }

    #[test]
    fn uninstantiated_rule_has_no_template() {
        let rule = ArtifactRule::new(r"C:\Users\{LLM_NAME}");
        assert!(matches!(
            rule.path_template(),
            Err(Error::UnboundParameter { .. })
        ));
    }

    #[test]
    fn instantiate_fails_on_unbound() {
        let rule = ArtifactRule::new(r"C:\{LLM_NAME}");
        assert!(matches!(
            rule.instantiate(&TemplateParams::new()),
            Err(Error::UnboundParameter { .. })
        ));
    }

    #[test]
    fn category_key_folding() {
        let category = Category::new("Browser+Cache", vec![]);
        assert_eq!(category.key(false), "Browser+Cache");
        assert_eq!(category.key(true), "Browser_Cache");
    }
}
