//! `machtype`-backed identity probe.

use std::path::PathBuf;
use std::time::Duration;

use athkit_core::{MachtypeProbe, MachtypeQuery};
use tracing::{debug, info};

use crate::runner::BoundedCommand;

const MACHTYPE: &str = "machtype";
const MACHTYPE_FALLBACK: &str = "/bin/machtype";

/// Runs `machtype` candidates in order until one answers.
///
/// A candidate that fails to start, exits non-zero, times out or prints
/// nothing is logged and skipped.
#[derive(Debug, Clone)]
pub struct CommandMachtype {
    candidates: Vec<PathBuf>,
    runner: BoundedCommand,
}

impl CommandMachtype {
    /// `machtype` from `PATH` first, then `/bin/machtype`.
    pub fn new(timeout: Duration) -> Self {
        let mut candidates = Vec::with_capacity(2);
        match which::which(MACHTYPE) {
            Ok(path) => candidates.push(path),
            Err(e) => debug!("{MACHTYPE} not on PATH: {e}"),
        }
        let fallback = PathBuf::from(MACHTYPE_FALLBACK);
        if !candidates.contains(&fallback) {
            candidates.push(fallback);
        }
        Self::with_candidates(candidates, timeout)
    }

    pub const fn with_candidates(candidates: Vec<PathBuf>, timeout: Duration) -> Self {
        Self {
            candidates,
            runner: BoundedCommand::new(timeout),
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}

impl MachtypeProbe for CommandMachtype {
    fn query(&self, query: MachtypeQuery) -> Option<String> {
        for candidate in &self.candidates {
            match self.runner.output(candidate, query.flag()) {
                Ok(out) if !out.is_empty() => {
                    debug!("{} answered {query}: {out}", candidate.display());
                    return Some(out);
                }
                Ok(_) => info!("{} printed no {query}", candidate.display()),
                Err(e) => info!("Failed to run {}: {e}", candidate.display()),
            }
        }
        None
    }
}
