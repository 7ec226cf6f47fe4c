//! AFS introspection through the OpenAFS `fs` command.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use athkit_core::{AfsIntrospector, VolumeStatus};
use tracing::debug;

use crate::runner::BoundedCommand;

const FS: &str = "fs";

/// Shells out to `fs whichcell`, `fs examine` and `fs whereis`.
#[derive(Debug, Clone)]
pub struct FsCommandIntrospector {
    program: PathBuf,
    runner: BoundedCommand,
}

impl FsCommandIntrospector {
    pub fn new(timeout: Duration) -> Self {
        let program = which::which(FS).unwrap_or_else(|e| {
            debug!("{FS} not on PATH: {e}");
            PathBuf::from(FS)
        });
        Self::with_program(program, timeout)
    }

    pub fn with_program(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            runner: BoundedCommand::new(timeout),
        }
    }

    fn run(&self, subcommand: &str, path: &Path) -> io::Result<String> {
        let args = [OsStr::new(subcommand), OsStr::new("-path"), path.as_os_str()];
        Ok(self.runner.output(&self.program, args)?)
    }
}

impl AfsIntrospector for FsCommandIntrospector {
    fn which_cell(&self, path: &Path) -> io::Result<String> {
        parse_whichcell(&self.run("whichcell", path)?)
    }

    fn examine(&self, path: &Path) -> io::Result<VolumeStatus> {
        parse_examine(&self.run("examine", path)?)
    }

    fn where_is(&self, path: &Path) -> io::Result<Vec<String>> {
        parse_whereis(&self.run("whereis", path)?)
    }
}

fn invalid(what: &str, output: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("unexpected fs {what} output: {output}"),
    )
}

/// `File /afs/x lives in cell 'athena.mit.edu'`
fn parse_whichcell(output: &str) -> io::Result<String> {
    output
        .lines()
        .find_map(|line| line.split_once("lives in cell ").map(|(_, cell)| cell))
        .map(|cell| cell.trim().trim_matches('\'').to_string())
        .filter(|cell| !cell.is_empty())
        .ok_or_else(|| invalid("whichcell", output))
}

/// Volume name, blocks used and quota from `fs examine`.
///
/// An `unlimited` quota is reported as `0`.
fn parse_examine(output: &str) -> io::Result<VolumeStatus> {
    let mut name = None;
    let mut blocks_in_use = None;
    let mut max_quota = None;

    for line in output.lines().map(str::trim) {
        if let Some((_, rest)) = line.split_once(" named ") {
            name = rest.split_whitespace().next().map(str::to_string);
        } else if let Some(rest) = line.strip_prefix("Current disk quota is ") {
            max_quota = match rest.trim() {
                "unlimited" => Some(0),
                n => n.parse().ok(),
            };
        } else if let Some(rest) = line.strip_prefix("Current blocks used are ") {
            blocks_in_use = rest.trim().parse().ok();
        }
    }

    match (name, blocks_in_use, max_quota) {
        (Some(name), Some(blocks_in_use), Some(max_quota)) => Ok(VolumeStatus {
            name,
            blocks_in_use,
            max_quota,
        }),
        _ => Err(invalid("examine", output)),
    }
}

/// `File /afs/x is on host AFSDB-1.MIT.EDU` or `... is on hosts A B`
fn parse_whereis(output: &str) -> io::Result<Vec<String>> {
    let hosts = output
        .lines()
        .find_map(|line| line.split_once(" is on host").map(|(_, rest)| rest))
        .ok_or_else(|| invalid("whereis", output))?;
    let hosts = hosts.strip_prefix('s').unwrap_or(hosts);
    Ok(hosts.split_whitespace().map(str::to_string).collect())
}
