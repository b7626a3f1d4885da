// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — local PDF toolkit
//
// Entry point. Initialises logging, parses the command line, and runs one
// tool. Failures are reported in plain language with a non-zero exit code.

mod cli;
mod commands;
mod config_dir;

use std::process::ExitCode;

use clap::Parser;
use folio_core::FolioError;
use folio_core::human_errors::{HumanError, Severity, humanize_error};
use tracing_subscriber::EnvFilter;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            eprintln!("{}", failure_report(&human, &err));
            match human.severity {
                Severity::ActionRequired => ExitCode::from(2),
                Severity::Transient | Severity::Permanent => ExitCode::FAILURE,
            }
        }
    }
}

/// Plain-language explanation followed by the underlying cause.
fn failure_report(human: &HumanError, err: &FolioError) -> String {
    format!("{}: {}\n  cause: {}", human.title, human.message, err)
}
