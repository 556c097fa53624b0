use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use artex_extract::{CategoryOutcome, ExtractOptions, Extractor, Progress, Report};
use artex_rules::{Catalog, Mode};
use artex_source::{ImageProvider, MountedImage};
use chrono::Local;
use console::style;
use indicatif::HumanBytes;
use tracing::{info, warn};

use crate::cli::app::App;
use crate::report::{self, RunDetails};
use crate::ui::table::summary_table;
use crate::ui::tracker::{ProgressTrackerBuilder, Tracker, TrackerBuilder};

const BUILTIN_CATALOG: &str = include_str!("../../catalog/artifacts.json");

pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load artifact catalog {}", path.display())),
        None => Catalog::from_json_str(BUILTIN_CATALOG).context("Built-in artifact catalog is invalid"),
    }
}

pub fn run(app: App) -> Result<()> {
    if !app.image.exists() {
        bail!(
            "The specified image does not exist: {}",
            app.image.display()
        );
    }

    let catalog = load_catalog(app.catalog.as_deref())?;
    let mode = Mode::from(app.mode);
    let selection = catalog
        .select(&app.program, mode)
        .with_context(|| format!("No artifact definitions for '{}'", app.program))?;

    let program_dir = app.output_dir.join(&selection.program);
    artex_fs::ensure_dir(&program_dir)
        .with_context(|| format!("Failed to create output directory {}", program_dir.display()))?;
    let program_dir = program_dir.canonicalize().unwrap_or(program_dir);

    header(&app.image, &selection.program, mode, &program_dir);
    if selection.heuristic {
        warn!(program = %selection.program, %mode, "program is not predefined, using heuristic discovery");
        println!(
            "{}: '{}' is not a predefined LLM. Running in {} for '{}' mode.",
            style("Warning").yellow(),
            app.program,
            style("Heuristic Discovery Mode").bold(),
            mode
        );
        let known: Vec<&str> = catalog.programs().collect();
        if !known.is_empty() {
            println!("  {} {}", style("Defined programs:").dim(), known.join(", "));
        }
    }

    println!("[INFO] Opening image: {}", app.image.display());
    let provider = MountedImage::new(&app.image).volume_marker(app.volume_marker());
    let root = provider
        .open_root()
        .context("Could not find a volume to extract from in the image")?;

    let total = selection.categories.len();
    println!("[INFO] Starting artifact search for {total} categories...");
    info!(categories = total, rules = selection.rule_count(), "starting extraction");

    let tracker = ProgressTrackerBuilder::default()
        .with_len(total as u64)
        .with_prefix("Extracting")
        .hidden(app.verbose)
        .build();
    let pb = tracker.handle();
    let options = ExtractOptions::default()
        .keep_plus(!app.no_keep_plus)
        .on_progress(Arc::new(move |p: Progress| {
            pb.set_message(format!("{}: {}", p.category, p.path));
        }));

    let mut extractor = Extractor::new(&program_dir, options);
    let mut outcomes = Vec::with_capacity(total);
    for category in &selection.categories {
        tracker.set_message(format!("Processing: {}", category.name.replace(['_', '+'], " ")));
        outcomes.push(extractor.extract_category(&root, category));
        tracker.step(1);
    }
    tracker.finish();
    info!(
        succeeded = extractor.ledger().total_succeeded(),
        failed = extractor.ledger().total_failed(),
        "extraction finished"
    );

    println!("[INFO] Extraction process finished. Finalizing results...");
    for outcome in &outcomes {
        print_category_line(outcome);
    }

    let report = extractor.into_report();
    let details = RunDetails {
        image: app.image.clone(),
        program: selection.program.clone(),
        mode,
        heuristic: selection.heuristic,
        output_dir: program_dir.clone(),
        timestamp: Local::now(),
    };
    let report_path = report::write_reports(&program_dir, &details, &report)?;

    if !app.no_show_summary {
        println!();
        println!("{}", summary_table(&report));
        println!();
    }
    if !app.no_final_summary {
        final_summary(&selection.program, &report, &report_path, &program_dir);
    }

    Ok(())
}

fn header(image: &Path, program: &str, mode: Mode, output_dir: &Path) {
    println!("{}", style("artex - LLM Forensic Artifact Extraction").bold().cyan());
    println!("  {} {}", style("Analyzing Image:").dim(), image.display());
    println!("  {} {} ({})", style("LLM Target:").dim(), program, mode);
    println!("  {} {}", style("Output Directory:").dim(), output_dir.display());
    println!();
}

fn print_category_line(outcome: &CategoryOutcome) {
    let label = outcome.name.replace(['_', '+'], " ");
    let tag = if outcome.failed > 0 {
        style("[ALERT]").red()
    } else {
        style("[INFO]").green()
    };
    println!(
        "{tag} {label}: {} extracted, {} failed ({} matched, {})",
        outcome.succeeded,
        outcome.failed,
        outcome.matched(),
        HumanBytes(outcome.copied_bytes())
    );
}

fn final_summary(program: &str, report: &Report, report_path: &Path, program_dir: &Path) {
    let failures = if report.failed > 0 {
        format!("with {} failures.", style(report.failed).red().bold())
    } else {
        "without any errors.".to_string()
    };
    println!(
        "{} Successfully extracted {} artifacts {failures}",
        style(format!("Analysis for {} is complete.", program.to_lowercase())).bold(),
        style(report.succeeded).green().bold(),
    );
    println!("Detailed success/failure paths can be found in the report file.");
    println!("{} {}", style("Report File:").dim(), report_path.display());
    println!("{} {}", style("Result Folder:").dim(), program_dir.display());
}
