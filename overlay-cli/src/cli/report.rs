//! Plain-text report of a completed overlay run.

use std::io::{self, Write};

use overlay_core::TreeEdge;
use overlay_topology::Topology;

use super::commands::ExecutionSummary;

const UNREACHABLE: &str = "-";
const NO_EDGES: &str = "none";
const MIN_COLUMN_WIDTH: usize = 7;

/// Renders `summary` to `writer`.
///
/// Sections appear in pipeline order: the distance matrix, cluster
/// membership, leaders and roots, the tree of every cluster, the
/// inter-cluster edges, the global tree, the neighbour lists and finally
/// where the document goes.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_report(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let ExecutionSummary {
        topology,
        plan,
        destination,
        ..
    } = summary;
    let name = |node: usize| topology.id(node).unwrap_or("?");

    render_matrix(topology, &mut writer)?;

    writeln!(writer, "\nclusters: {}", plan.clusters().len())?;
    for cluster in plan.clusters() {
        let members: Vec<&str> = cluster.members().iter().map(|&m| name(m)).collect();
        writeln!(writer, "  {}: {}", cluster.id(), members.join(" "))?;
    }

    writeln!(writer, "\nleaders:")?;
    for representatives in plan.representatives() {
        writeln!(
            writer,
            "  {}: leader {}, root {}",
            representatives.cluster(),
            name(representatives.leader()),
            name(representatives.root())
        )?;
    }

    writeln!(writer, "\ncluster trees:")?;
    for (cluster, tree) in plan.clusters().iter().zip(plan.intra_trees()) {
        writeln!(writer, "  {}: {}", cluster.id(), edge_list(topology, tree.edges()))?;
    }

    writeln!(
        writer,
        "\ninter-cluster edges: {}",
        edge_list(topology, plan.inter_tree().edges())
    )?;

    let global = plan.global_tree();
    writeln!(
        writer,
        "\nglobal tree: {} edges, total latency {:.1}",
        global.edges().len(),
        global.total_weight()
    )?;
    for edge in global.edges() {
        writeln!(writer, "  {}", edge_label(topology, edge))?;
    }

    writeln!(writer, "\nneighbours:")?;
    for (node, neighbours) in plan.neighbours().iter() {
        let entries: Vec<String> = neighbours
            .iter()
            .map(|entry| format!("{} ({:.1})", name(entry.node()), entry.weight()))
            .collect();
        writeln!(writer, "  {}: {}", name(node), entries.join(", "))?;
    }

    match destination {
        Some(path) => writeln!(writer, "\noverlay written to {}", path.display()),
        None => writeln!(writer, "\noverlay not written"),
    }
}

fn render_matrix(topology: &Topology, writer: &mut impl Write) -> io::Result<()> {
    let width = topology
        .nodes()
        .iter()
        .map(|node| node.id.len())
        .max()
        .unwrap_or(0)
        .max(MIN_COLUMN_WIDTH);
    writeln!(
        writer,
        "distance matrix ({} nodes, {} links):",
        topology.len(),
        topology.matrix().edge_count()
    )?;
    write!(writer, "{:>width$}", "")?;
    for node in topology.nodes() {
        write!(writer, " {:>width$}", node.id)?;
    }
    writeln!(writer)?;
    for (row, node) in topology.nodes().iter().enumerate() {
        write!(writer, "{:>width$}", node.id)?;
        for column in 0..topology.len() {
            match topology.matrix().distance(row, column) {
                Some(latency) => write!(writer, " {latency:>width$.1}")?,
                None => write!(writer, " {UNREACHABLE:>width$}")?,
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn edge_list(topology: &Topology, edges: &[TreeEdge]) -> String {
    if edges.is_empty() {
        return NO_EDGES.to_owned();
    }
    edges
        .iter()
        .map(|edge| edge_label(topology, edge))
        .collect::<Vec<_>>()
        .join(", ")
}

fn edge_label(topology: &Topology, edge: &TreeEdge) -> String {
    let name = |node: usize| topology.id(node).unwrap_or("?");
    format!(
        "{}-{} ({:.1})",
        name(edge.source()),
        name(edge.target()),
        edge.weight()
    )
}
