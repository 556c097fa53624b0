//! `extraction_report.txt` and `extraction_report.json`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use artex_extract::{Report, Status};
use artex_fs::{AtomicWriteOptions, atomic_write};
use artex_rules::Mode;
use chrono::{DateTime, Local};
use serde::Serialize;

pub const TEXT_REPORT: &str = "extraction_report.txt";
pub const JSON_REPORT: &str = "extraction_report.json";

const RULE: &str = "===============================================================";
const THIN_RULE: &str = "---------------------------------------------------------------";

#[derive(Debug, Clone, Serialize)]
pub struct RunDetails {
    pub image: PathBuf,
    pub program: String,
    pub mode: Mode,
    pub heuristic: bool,
    pub output_dir: PathBuf,
    pub timestamp: DateTime<Local>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    run: &'a RunDetails,
    #[serde(flatten)]
    report: &'a Report,
}

pub fn render_text(details: &RunDetails, report: &Report) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, details, report);
    out
}

fn write_text(out: &mut String, details: &RunDetails, report: &Report) -> std::fmt::Result {
    writeln!(out, "{RULE}")?;
    writeln!(out, " artex - LLM Forensic Artifact Extraction Log")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;

    writeln!(out, "Run Details")?;
    writeln!(out, "-----------")?;
    writeln!(out, "- Source Image: {}", details.image.display())?;
    writeln!(out, "- LLM Target: {} (Mode: {})", details.program, details.mode)?;
    if details.heuristic {
        writeln!(out, "- Discovery: heuristic")?;
    }
    writeln!(out, "- Output Directory: {}", details.output_dir.display())?;
    writeln!(out, "- Timestamp: {}", details.timestamp.to_rfc3339())?;
    writeln!(out)?;

    writeln!(out, "Extraction Summary")?;
    writeln!(out, "------------------")?;
    writeln!(out, "- Categories Processed: {}", report.categories.len())?;
    writeln!(out, "- Successful Extractions: {}", report.succeeded)?;
    writeln!(out, "- Failed Extractions: {}", report.failed)?;
    writeln!(out)?;

    writeln!(out, "{RULE}")?;
    writeln!(out, " Detailed Path Log")?;
    writeln!(out, "{RULE}")?;

    for category in &report.categories {
        writeln!(out)?;
        writeln!(out)?;
        writeln!(
            out,
            "## Category: {} ({} succeeded, {} failed)",
            category.name, category.succeeded, category.failed
        )?;
        writeln!(out, "{THIN_RULE}")?;

        if category.entries.is_empty() {
            writeln!(out, "- No paths found for this category.")?;
            continue;
        }

        for entry in &category.entries {
            match (&entry.status, &entry.reason) {
                (Status::Success, _) => writeln!(out, "{:<10} {}", "[SUCCESS]", entry.path)?,
                (Status::Failure, Some(reason)) => {
                    writeln!(out, "{:<10} {}: {}", "[FAILED]", entry.path, reason)?
                }
                (Status::Failure, None) => writeln!(out, "{:<10} {}", "[FAILED]", entry.path)?,
            }
        }
    }

    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "--- End of Report ---")
}

/// Write both report files into `dir`; returns the text report's path.
pub fn write_reports(dir: &Path, details: &RunDetails, report: &Report) -> Result<PathBuf> {
    let options = AtomicWriteOptions::default();

    let text_path = dir.join(TEXT_REPORT);
    atomic_write(&text_path, render_text(details, report).as_bytes(), options)
        .with_context(|| format!("Failed to write {}", text_path.display()))?;

    let json = serde_json::to_vec_pretty(&JsonReport {
        run: details,
        report,
    })
    .context("Failed to serialize report")?;
    let json_path = dir.join(JSON_REPORT);
    atomic_write(&json_path, &json, options)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    Ok(text_path)
}

#[cfg(test)]
mod tests {
    use artex_extract::Ledger;
    use chrono::TimeZone;

    use super::*;

    fn details() -> RunDetails {
        RunDetails {
            image: PathBuf::from("/evidence/CHATGPT.E01"),
            program: "CHATGPT".into(),
            mode: Mode::Api,
            heuristic: false,
            output_dir: PathBuf::from("/out/CHATGPT"),
            timestamp: Local.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    fn report() -> Report {
        let mut ledger = Ledger::new();
        ledger.ensure_category("Logs");
        ledger.record_failure("Cache", "/Users/bob/Cache/bad", "I/O error");
        ledger.record_success("Cache", "/Users/bob/Cache/index");
        ledger.into_report()
    }

    #[test]
    fn text_layout() {
        let text = render_text(&details(), &report());

        assert!(text.starts_with(RULE));
        assert!(text.contains("- LLM Target: CHATGPT (Mode: api)"));
        assert!(text.contains("- Categories Processed: 2"));
        assert!(text.contains("## Category: Cache (1 succeeded, 1 failed)"));
        assert!(text.contains("## Category: Logs (0 succeeded, 0 failed)\n"));
        assert!(text.contains("- No paths found for this category."));
        assert!(text.trim_end().ends_with("--- End of Report ---"));

        let success = text.find("[SUCCESS]  /Users/bob/Cache/index").unwrap();
        let failure = text.find("[FAILED]   /Users/bob/Cache/bad: I/O error").unwrap();
        assert!(success < failure);
    }

    #[test]
    fn writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = write_reports(dir.path(), &details(), &report()).unwrap();
        assert_eq!(text_path, dir.path().join(TEXT_REPORT));

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(JSON_REPORT)).unwrap()).unwrap();
        assert_eq!(json["run"]["program"], "CHATGPT");
        assert_eq!(json["run"]["mode"], "api");
        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["categories"][0]["name"], "Cache");
    }
}
