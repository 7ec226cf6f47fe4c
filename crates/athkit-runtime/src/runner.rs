//! Child processes with a wall-clock limit.
//!
//! Output pipes are drained on helper threads so a chatty child can never
//! block on a full pipe while we wait for it.

use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

/// Default limit for probe commands.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed while waiting for {}: {source}", .program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} timed out after {}ms", .program.display(), .timeout.as_millis())]
    TimedOut { program: PathBuf, timeout: Duration },

    #[error("{} exited with {status}{}", .program.display(), stderr_suffix(.stderr))]
    Failed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

impl From<RunnerError> for io::Error {
    fn from(err: RunnerError) -> Self {
        let kind = match &err {
            RunnerError::Spawn { source, .. } | RunnerError::Wait { source, .. } => source.kind(),
            RunnerError::TimedOut { .. } => io::ErrorKind::TimedOut,
            RunnerError::Failed { .. } => io::ErrorKind::Other,
        };
        Self::new(kind, err)
    }
}

/// Runs commands to completion or kills them at the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedCommand {
    timeout: Duration,
}

impl BoundedCommand {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` with `args` and return its trimmed stdout.
    ///
    /// A non-zero exit status is an error; stdin is closed.
    pub fn output<I, S>(&self, program: impl Into<PathBuf>, args: I) -> Result<String, RunnerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = program.into();
        debug!("Running {} (timeout {:?})", program.display(), self.timeout);

        let mut child = Command::new(&program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.wait(&mut child) {
            Ok(Some(status)) => status,
            Ok(None) => {
                // Reap the child; its pipes close and the drain threads finish
                let _ = child.kill();
                let _ = child.wait();
                return Err(RunnerError::TimedOut {
                    program,
                    timeout: self.timeout,
                });
            }
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RunnerError::Wait { program, source });
            }
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);
        if status.success() {
            Ok(stdout.trim().to_string())
        } else {
            Err(RunnerError::Failed {
                program,
                status,
                stderr: stderr.trim().to_string(),
            })
        }
    }

    fn wait(&self, child: &mut Child) -> io::Result<Option<ExitStatus>> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}

impl Default for BoundedCommand {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
