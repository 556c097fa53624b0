//! Path template normalization and parameter rendering.
//!
//! Templates are written the way the artifact lives on the source system,
//! e.g. `C:\Users\*\AppData\Roaming\Claude`. Normalization turns that into
//! upper-cased segments with the volume prefix dropped:
//! `["USERS", "*", "APPDATA", "ROAMING", "CLAUDE"]`.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};

pub const SEPARATOR: char = '/';
const FOREIGN_SEPARATOR: char = '\\';
const PREFIX_TERMINATOR: char = ':';

/// Split a raw template into canonical segments.
///
/// A prefix is stripped when a `:` appears before the first separator, or
/// anywhere in a template that has no separator. Empty segments are dropped.
pub fn normalize(template: &str) -> Result<Vec<String>> {
    let unified = template.replace(FOREIGN_SEPARATOR, "/");
    let stripped = match (unified.find(PREFIX_TERMINATOR), unified.find(SEPARATOR)) {
        (Some(colon), Some(sep)) if colon < sep => &unified[colon + 1..],
        (Some(colon), None) => &unified[colon + 1..],
        _ => unified.as_str(),
    };

    let segments: Vec<String> = stripped
        .to_uppercase()
        .split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if segments.is_empty() {
        return Err(Error::InvalidTemplate {
            template: template.to_string(),
            reason: "no path segments".to_string(),
        });
    }
    Ok(segments)
}

/// A normalized template. Displays as `/SEG/SEG`, which normalizes back to
/// the same segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<String>,
}

impl PathTemplate {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            segments: normalize(raw)?,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

/// Named values substituted for `{NAME}` placeholders when a rule is
/// instantiated.
///
/// Only `{IDENT}` with an upper-case identifier is a placeholder; other
/// braces (such as the GUID folders common under `AppData`) are literal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateParams {
    values: IndexMap<String, String>,
}

impl TemplateParams {
    pub const PROGRAM: &'static str = "LLM_NAME";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Parameters for a program-scoped rule set.
    pub fn for_program(program: &str) -> Self {
        Self::new().with(Self::PROGRAM, program)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn render(&self, input: &str) -> Result<String> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_param_name(&after[..close]) => {
                    let name = &after[..close];
                    let value = self.get(name).ok_or_else(|| Error::UnboundParameter {
                        template: input.to_string(),
                        name: name.to_string(),
                    })?;
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}

fn is_param_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase() || c == '_')
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_drive_prefix() {
        let segments = normalize(r"C:\Users\*\AppData\Roaming\Claude").unwrap();
        assert_eq!(segments, ["USERS", "*", "APPDATA", "ROAMING", "CLAUDE"]);
    }

    #[test]
    fn keeps_colon_after_first_separator() {
        let segments = normalize(r"\Data\file:stream").unwrap();
        assert_eq!(segments, ["DATA", "FILE:STREAM"]);
    }

    #[test]
    fn no_separator_single_segment() {
        assert_eq!(normalize("ntuser.dat").unwrap(), ["NTUSER.DAT"]);
        assert_eq!(normalize("C:pagefile.sys").unwrap(), ["PAGEFILE.SYS"]);
    }

    #[test]
    fn drops_empty_segments() {
        assert_eq!(normalize(r"C:\\A\\\B\").unwrap(), ["A", "B"]);
    }

    #[test]
    fn empty_is_invalid() {
        for raw in ["", "C:", r"C:\", "///"] {
            assert!(
                matches!(normalize(raw), Err(Error::InvalidTemplate { .. })),
                "{raw:?} should be invalid"
            );
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            r"C:\Windows\Prefetch\CHATGPT*.pf",
            r"D:\Users\*\AppData\Local\Packages\{GUID-LIKE}",
            r"\Data\file:stream",
            "relative/path",
        ] {
            let once = PathTemplate::parse(raw).unwrap();
            let twice = PathTemplate::parse(&once.to_string()).unwrap();
            assert_eq!(once.segments(), twice.segments(), "{raw}");
        }
    }

    #[test]
    fn display_form() {
        let t = PathTemplate::parse(r"C:\A\*\B.txt").unwrap();
        assert_eq!(t.to_string(), "/A/*/B.TXT");
    }

    #[test]
    fn render_substitutes_bound_params() {
        let params = TemplateParams::for_program("Ollama");
        let rendered = params
            .render(r"C:\Users\*\AppData\Local\{LLM_NAME}")
            .unwrap();
        assert_eq!(rendered, r"C:\Users\*\AppData\Local\Ollama");
    }

    #[test]
    fn render_leaves_guid_braces_alone() {
        let params = TemplateParams::new();
        let raw = r"C:\ProgramData\{1AC14E77-02E7-4E5D-B744-2EB1AE5198B7}\x";
        assert_eq!(params.render(raw).unwrap(), raw);
        assert_eq!(params.render("a{b").unwrap(), "a{b");
        assert_eq!(params.render("{lower}").unwrap(), "{lower}");
    }

    #[test]
    fn render_rejects_unbound() {
        let err = TemplateParams::new().render(r"C:\{LLM_NAME}").unwrap_err();
        assert_eq!(
            err.to_string(),
            r"template 'C:\{LLM_NAME}' uses unbound parameter '{LLM_NAME}'"
        );
    }
}
