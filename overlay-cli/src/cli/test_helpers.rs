//! Small helpers shared across CLI tests.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{CliError, LeaderArg, LinkageArg, RootArg, RunCommand, commands::run_command};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_document(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// A `run` command with default policies that writes next to its input.
pub(super) fn run_args(path: &Path, clusters: usize) -> RunCommand {
    RunCommand {
        path: path.to_path_buf(),
        clusters,
        linkage: LinkageArg::Single,
        root: RootArg::Medoid,
        leader: LeaderArg::Degree,
        sequential: false,
        output: None,
        no_write: false,
    }
}

pub(super) fn run_command_expecting_error(cmd: RunCommand, panic_msg: &str) -> CliError {
    match run_command(cmd) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

/// Report sink that fails at a chosen point, like a full stdout.
#[derive(Debug, Clone, Copy)]
pub(super) enum BrokenReport {
    /// Every write fails.
    OnWrite,
    /// Writes succeed but the final flush fails.
    OnFlush,
}

impl Write for BrokenReport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::OnWrite => Err(io::Error::new(io::ErrorKind::StorageFull, "no space left")),
            Self::OnFlush => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"))
    }
}

/// Report sink that records whether `destination` existed when flushed.
pub(super) struct FlushWatcher<'a> {
    pub destination: &'a Path,
    pub existed_at_flush: Option<bool>,
    pub report: Vec<u8>,
}

impl Write for FlushWatcher<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.report.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.existed_at_flush = Some(self.destination.exists());
        Ok(())
    }
}
