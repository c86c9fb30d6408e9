//! CLI entry point for planning fog-node hierarchies.
//!
//! Parses arguments with clap, plans the hierarchy, renders the summary to
//! stdout and maps failures to a non-zero exit status. Logging is initialised
//! first so every later step can emit structured diagnostics.

use std::{
    io::{self, BufWriter, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use fogtier_cli::{
    cli::{Cli, CliError, ReportStatus, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Runs the command and prints its summary. A report that could not be
/// written is logged after the summary and turns into a failing exit status.
fn try_main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;

    if let ReportStatus::Failed(err) = &summary.report {
        error!(error = %err, code = err.code().as_str(), "failed to write report");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(code) => code,
        Err(err) => {
            let code = err.downcast_ref::<CliError>().and_then(CliError::code);
            error!(
                error = %format_args!("{err:#}"),
                code = code.map(field::display),
                "command execution failed"
            );
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
