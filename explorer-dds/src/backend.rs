use crate::SolverRequest;
use serde::Deserialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("no solver command configured")]
    NoCommand,
    #[error("failed to spawn solver: {0}")]
    Spawn(String),
    #[error("I/O error talking to solver: {0}")]
    Io(String),
    #[error("solver exited unsuccessfully: {0}")]
    Status(String),
    #[error("malformed solver response: {0}")]
    Protocol(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Something that can answer solver requests.
///
/// Implementations return the solver's JSON reply untouched; parsing and
/// memoization happen in [`crate::DoubleDummy`].
pub trait SolverBackend: Send + Sync {
    fn solve(&self, request: &SolverRequest) -> Result<serde_json::Value, SolverError>;
}

/// Runs an external solver program once per request.
///
/// The request is written to the child's stdin as a single JSON line and
/// the whole of its stdout is read back as one JSON value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessSolver {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Solves slower than this are logged; they are never killed
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ProcessSolver {
    pub fn new(command: impl Into<String>) -> Self {
        ProcessSolver {
            command: command.into(),
            ..ProcessSolver::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl SolverBackend for ProcessSolver {
    fn solve(&self, request: &SolverRequest) -> Result<serde_json::Value, SolverError> {
        if self.command.is_empty() {
            return Err(SolverError::NoCommand);
        }

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::piped()).stdout(Stdio::piped());

        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|err| SolverError::Spawn(format!("{}: {err}", self.command)))?;
        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| SolverError::Io("stdin unavailable".into()))?;
            serde_json::to_writer(&mut stdin, request)
                .map_err(|err| SolverError::Protocol(err.to_string()))?;
            stdin
                .write_all(b"\n")
                .map_err(|err| SolverError::Io(err.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|err| SolverError::Io(err.to_string()))?;
        if !output.status.success() {
            return Err(SolverError::Status(output.status.to_string()));
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        debug!(command = %self.command, elapsed_ms, "solver returned");
        if let Some(timeout_ms) = self.timeout_ms {
            if elapsed_ms > timeout_ms {
                warn!(
                    command = %self.command,
                    elapsed_ms,
                    timeout_ms,
                    "solver exceeded its time budget"
                );
            }
        }

        serde_json::from_slice(&output.stdout).map_err(|err| SolverError::Protocol(err.to_string()))
    }
}
