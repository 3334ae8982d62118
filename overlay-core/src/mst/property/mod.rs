//! Property-based tests for the Prim spanning-tree builder.
//!
//! Checks optimality against a brute-force oracle on small graphs and on
//! induced member subsets, the structural tree invariants on larger ones,
//! that the total weight does not depend on which vertex seeds the tree, and
//! that every tree layer of a full overlay run keeps its shape.

mod oracle;
mod pipeline;
mod structural;
