//! Process invocation types for the host-does-IO pattern.
//!
//! # Design
//! These types describe a command and its captured output as plain data.
//! Probes build a `CommandRequest` and parse a `CommandOutput` without ever
//! spawning a process themselves; the caller (the host agent, the CLI, or a
//! C program on the other side of the FFI boundary) runs the command.
//!
//! All fields use owned types so values can cross the FFI boundary without
//! lifetime concerns.

use std::fmt;

/// A single process invocation described as plain data.
///
/// Built by `MunkiFacts::build_*` methods. The caller executes it and hands
/// back the corresponding `CommandOutput`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of running a `CommandRequest`.
///
/// `status` is `None` when the process never ran or was killed by a signal.
/// Probes read `stdout` regardless of `status`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    /// Output of a command that exited 0 and printed `stdout`.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
        }
    }

    /// Output standing in for a command that could not be run at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout with surrounding whitespace removed, the way the host's
    /// command primitive hands it to a fact.
    pub fn trimmed(&self) -> &str {
        self.stdout.trim()
    }
}
