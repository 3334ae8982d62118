//! Latency fixtures shared by the core, topology and CLI test suites.

use std::fmt::Write as _;

/// Number of nodes in [`WORKED_EXAMPLE`].
pub const WORKED_EXAMPLE_NODES: usize = 10;

/// Dense, fully reachable ten-node latency table.
///
/// Partitioned into three clusters with complete linkage, gateway roots and
/// highest-id leaders it yields `{0, 2, 4, 7}`, `{3, 8}` and `{1, 5, 6, 9}`
/// with roots 2, 3 and 5.
pub const WORKED_EXAMPLE: [[f32; WORKED_EXAMPLE_NODES]; WORKED_EXAMPLE_NODES] = [
    [0.0, 88.0, 45.0, 80.0, 14.0, 89.0, 90.0, 10.0, 81.0, 91.0],
    [88.0, 0.0, 92.0, 103.0, 95.0, 65.0, 70.0, 99.0, 106.0, 60.0],
    [45.0, 92.0, 0.0, 82.0, 50.0, 23.0, 93.0, 48.0, 83.0, 94.0],
    [80.0, 103.0, 82.0, 0.0, 84.0, 35.0, 104.0, 86.0, 59.0, 105.0],
    [14.0, 95.0, 50.0, 84.0, 0.0, 96.0, 97.0, 20.0, 85.0, 98.0],
    [89.0, 65.0, 23.0, 35.0, 96.0, 0.0, 19.0, 100.0, 107.0, 35.0],
    [90.0, 70.0, 93.0, 104.0, 97.0, 19.0, 0.0, 101.0, 108.0, 40.0],
    [10.0, 99.0, 48.0, 86.0, 20.0, 100.0, 101.0, 0.0, 87.0, 102.0],
    [81.0, 106.0, 83.0, 59.0, 85.0, 107.0, 108.0, 87.0, 0.0, 109.0],
    [91.0, 60.0, 94.0, 105.0, 98.0, 35.0, 40.0, 102.0, 109.0, 0.0],
];

/// Returns [`WORKED_EXAMPLE`] as dense rows with every entry reachable.
///
/// # Examples
/// ```
/// use overlay_test_support::fixtures::worked_example_rows;
///
/// let rows = worked_example_rows();
/// assert_eq!(rows.len(), 10);
/// assert_eq!(rows[0][7], Some(10.0));
/// ```
#[must_use]
pub fn worked_example_rows() -> Vec<Vec<Option<f32>>> {
    WORKED_EXAMPLE
        .iter()
        .map(|row| row.iter().copied().map(Some).collect())
        .collect()
}

/// Returns the upper-triangle edges of [`WORKED_EXAMPLE`].
#[must_use]
pub fn worked_example_edges() -> Vec<(usize, usize, f32)> {
    let mut edges = Vec::new();
    for (left, row) in WORKED_EXAMPLE.iter().enumerate() {
        for (right, &weight) in row.iter().enumerate().skip(left + 1) {
            edges.push((left, right, weight));
        }
    }
    edges
}

/// Renders [`WORKED_EXAMPLE`] as a topology document in dense form.
///
/// Nodes are named `n0..n9`; even nodes carry a `"region": "eu"` entry and
/// odd nodes `"region": "us"` so metadata passthrough can be asserted.
#[must_use]
pub fn worked_example_document() -> String {
    let mut document = String::from("{\n  \"nodes\": [\n");
    for node in 0..WORKED_EXAMPLE_NODES {
        let region = if node % 2 == 0 { "eu" } else { "us" };
        let separator = if node + 1 == WORKED_EXAMPLE_NODES { "" } else { "," };
        let _ = writeln!(
            document,
            "    {{ \"id\": \"n{node}\", \"region\": \"{region}\" }}{separator}"
        );
    }
    document.push_str("  ],\n  \"matrix\": [\n");
    for (index, row) in WORKED_EXAMPLE.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|weight| format!("{weight:.1}")).collect();
        let separator = if index + 1 == WORKED_EXAMPLE_NODES { "" } else { "," };
        let _ = writeln!(document, "    [{}]{separator}", cells.join(", "));
    }
    document.push_str("  ]\n}\n");
    document
}
