//! Command implementations and argument parsing for the overlay CLI.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use overlay_core::{
    ExecutionStrategy, LeaderPolicy, Linkage, OverlayBuilder, OverlayError, OverlayPlan,
    RootPolicy, TreeScope,
};
use overlay_topology::{OverlayDocument, Topology, TopologyError, derived_output_path};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{Span, error, field, info, instrument};

use super::report::render_report;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "overlay",
    about = "Build a clustered spanning-tree gossip overlay from a latency topology."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Partition a topology and derive its overlay.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Topology document (JSON) to read.
    pub path: PathBuf,

    /// Number of clusters to partition the nodes into.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub clusters: usize,

    /// Inter-cluster distance used while merging.
    #[arg(long, value_enum, default_value_t = LinkageArg::Single)]
    pub linkage: LinkageArg,

    /// Rule for choosing each cluster's tree root.
    #[arg(long, value_enum, default_value_t = RootArg::Medoid)]
    pub root: RootArg,

    /// Rule for choosing each cluster's leader.
    #[arg(long, value_enum, default_value_t = LeaderArg::Degree)]
    pub leader: LeaderArg,

    /// Build the cluster trees one after another on the main thread.
    #[arg(long)]
    pub sequential: bool,

    /// Where to write the overlay document (defaults to `<stem>_agglomerative.json`
    /// next to the input).
    #[arg(long, conflicts_with = "no_write")]
    pub output: Option<PathBuf>,

    /// Print the report without writing the overlay document.
    #[arg(long = "no-write")]
    pub no_write: bool,
}

/// Linkage criteria accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkageArg {
    /// Closest pair of members.
    Single,
    /// Farthest pair of members.
    Complete,
    /// Mean over all reachable member pairs.
    Average,
}

impl From<LinkageArg> for Linkage {
    fn from(value: LinkageArg) -> Self {
        match value {
            LinkageArg::Single => Self::Single,
            LinkageArg::Complete => Self::Complete,
            LinkageArg::Average => Self::Average,
        }
    }
}

/// Root policies accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RootArg {
    /// Member with the smallest total latency to the rest of its cluster.
    Medoid,
    /// Member with the cheapest link leaving the cluster.
    Gateway,
}

impl From<RootArg> for RootPolicy {
    fn from(value: RootArg) -> Self {
        match value {
            RootArg::Medoid => Self::Medoid,
            RootArg::Gateway => Self::Gateway,
        }
    }
}

/// Leader policies accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LeaderArg {
    /// Member with the most reachable peers inside its cluster.
    Degree,
    /// Member with the highest node index.
    HighestId,
}

impl From<LeaderArg> for LeaderPolicy {
    fn from(value: LeaderArg) -> Self {
        match value {
            LeaderArg::Degree => Self::HighestDegree,
            LeaderArg::HighestId => Self::HighestId,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The topology document could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The topology document was invalid, or the overlay document could not
    /// be rendered.
    #[error(transparent)]
    Topology(#[from] TopologyError),
    /// Overlay construction failed.
    #[error(transparent)]
    Core(#[from] OverlayError),
    /// The overlay document could not be written.
    #[error("failed to write `{path}`: {source}")]
    Write {
        /// Destination that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The report could not be written or flushed.
    #[error("failed to write report: {source}")]
    Report {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl CliError {
    /// Returns the stable code of the underlying library error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(err) => Some(err.code().as_str()),
            Self::Topology(TopologyError::Matrix(err)) => Some(err.code().as_str()),
            _ => None,
        }
    }
}

/// Outcome of a successful `run` command, ready to be published.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// The topology that was loaded.
    pub topology: Topology,
    /// Every stage output of the overlay run.
    pub plan: OverlayPlan,
    /// The overlay document derived from the plan.
    pub document: OverlayDocument,
    /// Where [`publish`] stores the document; `None` with `--no-write`.
    pub destination: Option<PathBuf>,
}

/// Executes the CLI command represented by `cli`.
///
/// Nothing touches the filesystem beyond reading the topology; the document
/// is stored by [`publish`].
///
/// # Errors
/// Returns [`CliError`] when loading or overlay construction fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use overlay_cli::cli::{Cli, Command, LeaderArg, LinkageArg, RootArg, RunCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     r#"{ "nodes": [{ "id": "a" }, { "id": "b" }],
///          "edges": [{ "source": "a", "target": "b", "latency": 4.0 }] }"#,
/// )?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         path: file.path().to_path_buf(),
///         clusters: 2,
///         linkage: LinkageArg::Single,
///         root: RootArg::Medoid,
///         leader: LeaderArg::Degree,
///         sequential: false,
///         output: None,
///         no_write: true,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.plan.clusters().len(), 2);
/// assert!(summary.destination.is_none());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(path = %command.path.display(), clusters = command.clusters),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let overlay = OverlayBuilder::new()
        .with_cluster_count(command.clusters)
        .with_linkage(command.linkage.into())
        .with_root_policy(command.root.into())
        .with_leader_policy(command.leader.into())
        .with_execution_strategy(if command.sequential {
            ExecutionStrategy::Sequential
        } else {
            ExecutionStrategy::Auto
        })
        .build()?;

    let topology = load_topology(&command.path)?;
    let plan = overlay
        .run(topology.matrix())
        .inspect_err(|err| report_offenders(&topology, err))?;
    let document = OverlayDocument::from_plan(&topology, &plan)?;

    let destination = if command.no_write {
        None
    } else {
        Some(
            command
                .output
                .unwrap_or_else(|| derived_output_path(&command.path)),
        )
    };

    info!(
        nodes = topology.len(),
        clusters = plan.clusters().len(),
        write = destination.is_some(),
        "command completed"
    );
    Ok(ExecutionSummary {
        topology,
        plan,
        document,
        destination,
    })
}

#[instrument(name = "cli.load_topology", err, fields(path = %path.display()))]
pub(super) fn load_topology(path: &Path) -> Result<Topology, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Topology::from_reader(BufReader::new(file))?)
}

/// Renders the report to `out` and stores the overlay document.
///
/// The document is first written to a temporary file next to its
/// destination. It is moved into place only after the report has been
/// written and flushed, so a failure at any step leaves no document behind.
///
/// # Errors
/// Returns [`CliError::Write`] when the document cannot be staged or moved
/// into place, and [`CliError::Report`] when `out` fails.
#[instrument(
    name = "cli.publish",
    err,
    skip_all,
    fields(destination = field::Empty),
)]
pub fn publish(summary: &ExecutionSummary, mut out: impl Write) -> Result<(), CliError> {
    let staged = match summary.destination.as_deref() {
        Some(destination) => {
            Span::current().record("destination", field::display(destination.display()));
            Some((stage_document(&summary.document, destination)?, destination))
        }
        None => None,
    };

    render_report(summary, &mut out)
        .and_then(|()| out.flush())
        .map_err(|source| CliError::Report { source })?;

    if let Some((file, destination)) = staged {
        file.persist(destination).map_err(|err| CliError::Write {
            path: destination.to_path_buf(),
            source: err.error,
        })?;
        info!(path = %destination.display(), "overlay document written");
    }
    Ok(())
}

#[instrument(name = "cli.stage_document", err, skip(document), fields(path = %destination.display()))]
fn stage_document(
    document: &OverlayDocument,
    destination: &Path,
) -> Result<NamedTempFile, CliError> {
    let write_failed = |source: io::Error| CliError::Write {
        path: destination.to_path_buf(),
        source,
    };
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(directory).map_err(write_failed)?;
    let mut writer = BufWriter::new(&mut staged);
    document.write_to(&mut writer).map_err(|err| match err {
        TopologyError::Json(json) if json.is_io() => write_failed(json.into()),
        other => CliError::Topology(other),
    })?;
    writer.flush().map_err(write_failed)?;
    drop(writer);
    Ok(staged)
}

/// Logs the node ids behind an overlay failure.
fn report_offenders(topology: &Topology, err: &OverlayError) {
    let name = |node: usize| topology.id(node).unwrap_or("<unknown>");
    match err {
        OverlayError::DisconnectedSubgraph {
            scope, unreachable, ..
        } => {
            let cluster = match scope {
                TreeScope::Cluster(id) => Some(id.get()),
                TreeScope::Roots => None,
            };
            error!(
                node = name(*unreachable),
                cluster,
                "node cannot be reached over finite latencies"
            );
        }
        OverlayError::UnreachablePartition { clusters, .. } => {
            for (index, members) in clusters.iter().enumerate() {
                let names: Vec<&str> = members.iter().map(|&member| name(member)).collect();
                error!(
                    group = index,
                    members = %names.join(","),
                    "group cannot be merged with any other"
                );
            }
        }
        _ => {}
    }
}
