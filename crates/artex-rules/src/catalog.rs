//! JSON rule catalog.
//!
//! ```json
//! {
//!   "CLAUDE": {
//!     "Program+Data": [
//!       { "path": "C:\\Users\\*\\AppData\\Roaming\\Claude", "extract_from": "Claude" }
//!     ]
//!   },
//!   "_HEURISTICS_API": { ... }
//! }
//! ```
//!
//! Program keys are upper-case identifiers. Keys starting with
//! `_HEURISTICS_` hold rule sets for programs the catalog does not know;
//! their templates use `{LLM_NAME}` for the program name.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::rule::{ArtifactRule, Category};
use crate::template::TemplateParams;

const HEURISTICS_PREFIX: &str = "_HEURISTICS_";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Api,
    Standalone,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Standalone => "standalone",
        }
    }

    pub fn heuristic_key(self) -> String {
        format!("{HEURISTICS_PREFIX}{}", self.as_str().to_uppercase())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "standalone" => Ok(Self::Standalone),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

type RuleSet = IndexMap<String, Vec<ArtifactRule>>;

/// Program identifier → category → ordered rules. Declaration order is kept.
/// Program keys are case-insensitive; two keys that fold to the same name
/// are rejected.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    programs: IndexMap<String, RuleSet>,
}

/// The rule set chosen for one run, with parameters already applied.
#[derive(Clone, Debug)]
pub struct Selection {
    pub program: String,
    pub mode: Mode,
    /// Picked from a heuristic set because the program is not defined.
    pub heuristic: bool,
    pub categories: Vec<Category>,
}

impl Selection {
    pub fn rule_count(&self) -> usize {
        self.categories.iter().map(|c| c.rules.len()).sum()
    }
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Catalog = serde_json::from_str(json)?;
        let mut programs = IndexMap::with_capacity(raw.programs.len());
        for (name, rules) in raw.programs {
            let key = name.to_uppercase();
            if programs.contains_key(&key) {
                return Err(Error::DuplicateProgram { program: key });
            }
            programs.insert(key, rules);
        }
        Ok(Self { programs })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::CatalogRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalog = Self::from_json_str(&json)?;
        debug!(
            "loaded catalog {} with {} programs",
            path.display(),
            catalog.programs.len()
        );
        Ok(catalog)
    }

    /// Defined program identifiers, heuristic sets excluded.
    pub fn programs(&self) -> impl Iterator<Item = &str> {
        self.programs
            .keys()
            .map(String::as_str)
            .filter(|k| !k.starts_with(HEURISTICS_PREFIX))
    }

    pub fn contains(&self, program: &str) -> bool {
        let key = program.to_uppercase();
        !key.starts_with(HEURISTICS_PREFIX) && self.programs.contains_key(&key)
    }

    /// Pick and instantiate the rules for `program`.
    ///
    /// A defined program uses its own rules. Anything else falls back to the
    /// heuristic set for `mode`, with `{LLM_NAME}` bound to the program. A
    /// rule naming an unknown parameter is kept as written; it fails when its
    /// template is parsed, without taking the rest of the selection down.
    pub fn select(&self, program: &str, mode: Mode) -> Result<Selection> {
        let program = program.to_uppercase();
        let (rule_set, heuristic) = if self.contains(&program) {
            (&self.programs[&program], false)
        } else {
            let key = mode.heuristic_key();
            let set = self.programs.get(&key).ok_or_else(|| Error::UnknownProgram {
                program: program.clone(),
                heuristic: key.clone(),
            })?;
            (set, true)
        };

        let params = TemplateParams::for_program(&program);
        let categories = rule_set
            .iter()
            .map(|(name, rules)| {
                let rules = rules
                    .iter()
                    .map(|r| {
                        r.instantiate(&params).unwrap_or_else(|e| {
                            warn!(template = %r.template, error = %e, "rule left uninstantiated");
                            r.clone()
                        })
                    })
                    .collect();
                Category::new(name.clone(), rules)
            })
            .collect();

        Ok(Selection {
            program,
            mode,
            heuristic,
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "chatgpt": {
            "Program+Execution": [
                { "path": "C:\\Windows\\Prefetch\\CHATGPT*.pf" }
            ],
            "Browser+Cache": [
                { "path": "C:\\Users\\*\\AppData\\Local\\Packages\\*ChatGPT*\\LocalCache\\Roaming\\ChatGPT\\Cache\\Cache_Data", "extract_from": "Cache_Data" },
                { "path": "C:\\Users\\*\\AppData\\Local\\Packages\\*ChatGPT*\\LocalCache\\Roaming\\ChatGPT\\Network", "extract_files": ["Cookies", "Cookies-journal"] }
            ]
        },
        "_HEURISTICS_STANDALONE": {
            "Program+Data": [
                { "path": "C:\\Users\\*\\AppData\\Roaming\\{LLM_NAME}", "extract_from": "{LLM_NAME}" }
            ]
        }
    }"#;

    #[test]
    fn defined_program_keeps_category_order() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let selection = catalog.select("ChatGPT", Mode::Api).unwrap();

        assert!(!selection.heuristic);
        assert_eq!(selection.program, "CHATGPT");
        let names: Vec<_> = selection.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Program+Execution", "Browser+Cache"]);
        assert_eq!(selection.rule_count(), 3);
    }

    #[test]
    fn unknown_program_uses_heuristics() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let selection = catalog.select("ollama", Mode::Standalone).unwrap();

        assert!(selection.heuristic);
        let rule = &selection.categories[0].rules[0];
        assert_eq!(rule.template, r"C:\Users\*\AppData\Roaming\OLLAMA");
        assert_eq!(rule.anchor.as_deref(), Some("OLLAMA"));
    }

    #[test]
    fn unknown_program_without_heuristics() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let err = catalog.select("ollama", Mode::Api).unwrap_err();
        assert!(matches!(err, Error::UnknownProgram { ref heuristic, .. } if heuristic == "_HEURISTICS_API"));
    }

    #[test]
    fn unbound_parameter_spoils_only_its_rule() {
        let catalog = Catalog::from_json_str(
            r#"{ "JAN": { "Data": [
                { "path": "C:\\Users\\{USER_NAME}\\jan" },
                { "path": "C:\\Users\\*\\jan" }
            ] } }"#,
        )
        .unwrap();
        let selection = catalog.select("jan", Mode::Standalone).unwrap();

        let rules = &selection.categories[0].rules;
        assert!(matches!(
            rules[0].path_template(),
            Err(Error::UnboundParameter { ref name, .. }) if name == "USER_NAME"
        ));
        assert!(rules[1].path_template().is_ok());
    }

    #[test]
    fn keys_differing_only_in_case_are_rejected() {
        let err = Catalog::from_json_str(
            r#"{ "jan": { "Data": [] }, "Jan": { "Logs": [] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateProgram { ref program } if program == "JAN"));
    }

    #[test]
    fn heuristic_keys_are_not_programs() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.programs().collect::<Vec<_>>(), ["CHATGPT"]);
        assert!(!catalog.contains("_heuristics_standalone"));
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("API".parse::<Mode>().unwrap(), Mode::Api);
        assert_eq!("standalone".parse::<Mode>().unwrap(), Mode::Standalone);
        assert!("cloud".parse::<Mode>().is_err());
        assert_eq!(Mode::Standalone.heuristic_key(), "_HEURISTICS_STANDALONE");
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            Catalog::from_json_str(r#"{"X": {"Cat": [{"extract_from": "a"}]}}"#),
            Err(Error::CatalogParse(_))
        ));
    }
}
