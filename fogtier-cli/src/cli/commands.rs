//! Command implementations and argument parsing for the fogtier CLI.

use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use fogtier_core::{
    AgglomerativeClusterer, ClusterStrategy, DistanceMetric, Euclidean, ExecutionStrategy,
    Hierarchy, HierarchyError, HierarchyPlanner, Node, Planar, ReportError, ReportSummary,
    ReportWriter,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "fogtier", about = "Plan multi-level fog-node hierarchies.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster every level and link it to the level above.
    Plan(PlanCommand),
}

/// Options accepted by the `plan` command.
#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    /// JSON file holding an array of `{x, y, altitude, level}` records.
    pub path: PathBuf,

    /// Per-level table that bounds the clusterer.
    #[arg(long, value_enum, default_value_t = StrategyArg::Threshold)]
    pub strategy: StrategyArg,

    /// Distance used for clustering and linking.
    #[arg(long, value_enum, default_value_t = MetricArg::Euclidean)]
    pub metric: MetricArg,

    /// Linker execution backend.
    #[arg(long, value_enum, default_value_t = ExecutionArg::Auto)]
    pub execution: ExecutionArg,

    /// Number of levels; requires matching per-level tables when changed.
    #[arg(long = "layer-count")]
    pub layer_count: Option<usize>,

    /// Comma-separated maximum intra-cluster distances, lowest level first.
    #[arg(long = "max-distances", value_delimiter = ',')]
    pub max_distances: Option<Vec<f64>>,

    /// Comma-separated target cluster counts, lowest level first.
    #[arg(long = "target-counts", value_delimiter = ',')]
    pub target_counts: Option<Vec<usize>>,

    /// Directory receiving one `level{n}.json` document per level.
    #[arg(long = "report-dir")]
    pub report_dir: Option<PathBuf>,

    /// Link the level beneath the root geometrically instead of pinning it.
    #[arg(long = "unpinned-pre-root")]
    pub unpinned_pre_root: bool,
}

/// Clustering strategies selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Bound cluster diameters by the per-level maximum distance.
    Threshold,
    /// Merge down to the per-level target count.
    Count,
}

impl From<StrategyArg> for ClusterStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Threshold => Self::Threshold,
            StrategyArg::Count => Self::Count,
        }
    }
}

/// Distance metrics selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Straight-line distance including altitude.
    Euclidean,
    /// Ground-plane distance ignoring altitude.
    Planar,
}

/// Execution backends selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionArg {
    /// Let the library choose.
    Auto,
    /// Link on the calling thread.
    Sequential,
    /// Link on the rayon pool.
    Parallel,
}

impl From<ExecutionArg> for ExecutionStrategy {
    fn from(value: ExecutionArg) -> Self {
        match value {
            ExecutionArg::Auto => Self::Auto,
            ExecutionArg::Sequential => Self::Sequential,
            ExecutionArg::Parallel => Self::Parallel,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The node file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The node file is not a JSON array of node records.
    #[error("failed to parse nodes from `{path}`: {source}")]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Planner configuration or planning failed.
    #[error(transparent)]
    Core(#[from] HierarchyError),
}

impl CliError {
    /// Returns the stable library error code, when the failure has one.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(err) => Some(err.code().as_str()),
            Self::Io { .. } | Self::Parse { .. } => None,
        }
    }
}

/// Outcome of the optional report write-out.
#[derive(Debug)]
pub enum ReportStatus {
    /// No report directory was requested.
    Skipped,
    /// Every level was written.
    Written(ReportSummary),
    /// Writing failed; the planned hierarchy is still valid.
    Failed(ReportError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug)]
pub struct PlanSummary {
    /// The planned hierarchy.
    pub hierarchy: Hierarchy,
    /// What happened to the requested report.
    pub report: ReportStatus,
}

/// Executes the CLI command represented by `cli`.
///
/// A failed report write is returned inside [`PlanSummary::report`] rather
/// than as an error, so the caller can still render the hierarchy.
///
/// # Errors
/// Returns [`CliError`] when the node file cannot be loaded or planning
/// fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use fogtier_cli::cli::{Cli, Command, ExecutionArg, MetricArg, PlanCommand, StrategyArg, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     r#"[{"x":0,"y":0,"altitude":0,"level":1},{"x":5,"y":0,"altitude":0,"level":2}]"#,
/// )?;
/// let cli = Cli {
///     command: Command::Plan(PlanCommand {
///         path: file.path().to_path_buf(),
///         strategy: StrategyArg::Threshold,
///         metric: MetricArg::Euclidean,
///         execution: ExecutionArg::Auto,
///         layer_count: Some(2),
///         max_distances: Some(vec![10.0, 10.0]),
///         target_counts: None,
///         report_dir: None,
///         unpinned_pre_root: false,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.hierarchy.layer_count(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<PlanSummary, CliError> {
    match cli.command {
        Command::Plan(plan) => {
            Span::current().record("command", field::display("plan"));
            run_plan(plan)
        }
    }
}

#[instrument(
    name = "cli.plan",
    err,
    skip(command),
    fields(path = %command.path.display(), strategy = ?command.strategy, metric = ?command.metric),
)]
pub(super) fn run_plan(command: PlanCommand) -> Result<PlanSummary, CliError> {
    let planner = build_planner(&command)?;
    let nodes = load_nodes(&command.path)?;

    let metric: &dyn DistanceMetric = match command.metric {
        MetricArg::Euclidean => &Euclidean,
        MetricArg::Planar => &Planar,
    };
    let hierarchy = planner.plan_with(&nodes, &AgglomerativeClusterer, metric)?;
    info!(
        nodes = nodes.len(),
        layers = hierarchy.layer_count(),
        "plan completed"
    );

    let report = match &command.report_dir {
        None => ReportStatus::Skipped,
        Some(dir) => match ReportWriter::new(dir).write(&hierarchy) {
            Ok(summary) => ReportStatus::Written(summary),
            Err(err) => ReportStatus::Failed(err),
        },
    };
    Ok(PlanSummary { hierarchy, report })
}

pub(super) fn build_planner(command: &PlanCommand) -> Result<HierarchyPlanner, CliError> {
    let mut builder = HierarchyPlanner::builder()
        .with_cluster_strategy(command.strategy.into())
        .with_execution_strategy(command.execution.into())
        .with_pinned_pre_root(!command.unpinned_pre_root);
    if let Some(layer_count) = command.layer_count {
        builder = builder.with_layer_count(layer_count);
    }
    if let Some(max_distances) = &command.max_distances {
        builder = builder.with_max_distances(max_distances.clone());
    }
    if let Some(target_counts) = &command.target_counts {
        builder = builder.with_target_counts(target_counts.clone());
    }
    Ok(builder.build()?)
}

#[instrument(name = "cli.load_nodes", err, fields(path = %path.display(), nodes = field::Empty))]
pub(super) fn load_nodes(path: &Path) -> Result<Vec<Node>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let nodes: Vec<Node> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Span::current().record("nodes", nodes.len());
    Ok(nodes)
}

/// Renders a plan summary to the provided writer.
///
/// The first line is `layers: N`; each level follows as
/// `level<TAB>clusters<TAB>parents`, with parents in their raw encoding and
/// `-` for an empty row.
///
/// # Errors
/// Returns any I/O error raised by `writer`.
pub fn render_summary(summary: &PlanSummary, mut writer: impl Write) -> io::Result<()> {
    let hierarchy = &summary.hierarchy;
    writeln!(writer, "layers: {}", hierarchy.layer_count())?;
    for (layer, row) in hierarchy.layers().iter().zip(hierarchy.parents().rows()) {
        let parents = if row.is_empty() {
            "-".to_owned()
        } else {
            row.iter()
                .map(|link| link.as_raw().to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        writeln!(writer, "{}\t{}\t{parents}", layer.level(), layer.len())?;
    }
    if let ReportStatus::Written(report) = &summary.report {
        writeln!(writer, "report: {}", report.dir().display())?;
    }
    Ok(())
}
