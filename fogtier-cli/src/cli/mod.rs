//! Command-line interface for planning fog-node hierarchies.
//!
//! The `plan` command loads nodes from a JSON array, builds the hierarchy and
//! optionally writes a per-level report.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionArg, MetricArg, PlanCommand, PlanSummary, ReportStatus,
    StrategyArg, render_summary, run_cli,
};
