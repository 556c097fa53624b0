use std::process::ExitCode;

use clap::Parser;
use console::style;

use crate::cli::app::App;

mod cli;
mod logging;
mod report;
mod ui;

fn main() -> ExitCode {
    let app = App::parse();

    if let Err(e) = logging::init_logging(app.verbose) {
        eprintln!("{} {e:#}", style("Warning:").yellow());
    }

    match cli::run::run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("{} {e:#}", style("FATAL:").red().bold());
            ExitCode::FAILURE
        }
    }
}
