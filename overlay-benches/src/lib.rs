//! Benchmark support crate for the overlay builder.
//!
//! Provides a seeded latency-graph generator and the parameter types used by
//! the Criterion benchmarks for the end-to-end pipeline and the partitioner.

pub mod error;
pub mod graph;
pub mod params;
