//! Command executor port and its `std::process` implementation.
//!
//! # Design
//! Facts treat process output as a data source. `CommandExecutor` is the one
//! seam where a process is actually spawned, so registry code and tests can
//! swap in a scripted executor. `run` never fails: a command that cannot be
//! started comes back as empty output, and a non-zero exit still returns
//! whatever it printed.

use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::command::{CommandOutput, CommandRequest};
use crate::error::FactError;

/// Runs a `CommandRequest` and captures its stdout.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    fn run(&self, request: &CommandRequest) -> CommandOutput;
}

/// Executor backed by `std::process::Command`.
///
/// Stdin is closed and stderr is discarded. Blocks until the process exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Like `run`, but reports a process that could not be started.
    pub fn try_run(&self, request: &CommandRequest) -> Result<CommandOutput, FactError> {
        debug!(command = %request, "running fact command");
        let output = Command::new(&request.program)
            .args(&request.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| FactError::Spawn {
                program: request.program.clone(),
                source,
            })?;

        let status = output.status.code();
        if !output.status.success() {
            debug!(command = %request, ?status, "fact command exited unsuccessfully");
        }
        Ok(CommandOutput {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

impl CommandExecutor for SystemExecutor {
    fn run(&self, request: &CommandRequest) -> CommandOutput {
        self.try_run(request).unwrap_or_else(|err| {
            warn!("{err}");
            CommandOutput::empty()
        })
    }
}
