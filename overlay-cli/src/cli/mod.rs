//! Command-line interface orchestration for the overlay builder.
//!
//! The `run` command loads a topology document and builds the overlay;
//! [`publish`] then renders the plain-text report and stores the derived
//! document.

mod commands;
mod report;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, LeaderArg, LinkageArg, RootArg, RunCommand, publish,
    run_cli,
};
pub use report::render_report;

#[cfg(test)]
mod test_helpers;
