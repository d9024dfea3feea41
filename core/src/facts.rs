//! Command builders and output parsers for the Munki facts.
//!
//! # Design
//! `MunkiFacts` holds only the configured paths and carries no state between
//! calls. Each fact is split into a `build_*` method that produces a
//! `CommandRequest` and a `parse_*` method that consumes a `CommandOutput`.
//! The caller runs the process in between, keeping this module
//! deterministic and free of I/O.
//!
//! Parsers never fail. Whatever stdout was captured, including nothing at
//! all, is cleaned up and returned.

use tracing::debug;

use crate::command::{CommandOutput, CommandRequest};
use crate::config::{FactsConfig, HTTP_HEADERS_KEY};
use crate::types::{HeaderList, VersionInfo};

/// Stateless builder/parser pair for each Munki fact.
#[derive(Debug, Clone, Default)]
pub struct MunkiFacts {
    config: FactsConfig,
}

impl MunkiFacts {
    pub fn new(config: FactsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactsConfig {
        &self.config
    }

    /// `defaults read <preferences> AdditionalHttpHeaders`
    pub fn build_http_headers(&self) -> CommandRequest {
        CommandRequest::new(
            self.config.defaults_bin.as_str(),
            ["read", self.config.preferences.as_str(), HTTP_HEADERS_KEY],
        )
    }

    /// `managedsoftwareupdate --version`
    pub fn build_client_version(&self) -> CommandRequest {
        CommandRequest::new(self.config.msu_bin.as_str(), ["--version"])
    }

    /// Turn the plist array printed by `defaults read` into a header list.
    ///
    /// An absent key prints nothing, which comes back as `[""]`.
    pub fn parse_http_headers(&self, output: &CommandOutput) -> HeaderList {
        log_failure("http headers", output);
        let filtered = filter_preference_lines(&output.stdout);
        let collapsed = filtered.trim().trim_end().replace(",\n", ",");
        collapsed
            .trim_end()
            .replace('"', "")
            .split(',')
            .map(str::to_string)
            .collect()
    }

    /// Split the `--version` output into its dotted components.
    pub fn parse_client_version(&self, output: &CommandOutput) -> VersionInfo {
        log_failure("client version", output);
        let full = output.trimmed();
        let parts = version_parts(full);
        let part = |i: usize| parts.get(i).map(|p| (*p).to_string());
        VersionInfo {
            full: full.to_string(),
            major: part(0),
            minor: part(1),
            patch: part(2),
        }
    }
}

/// Drop lines holding a `(` or `)` and strip leading spaces from the rest.
///
/// This strips the array brackets `defaults` wraps around a list value.
pub fn filter_preference_lines(stdout: &str) -> String {
    stdout
        .lines()
        .filter(|line| !line.contains(['(', ')']))
        .map(|line| line.trim_start_matches(' '))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dot-separated parts of `raw`, ignoring trailing empty parts.
fn version_parts(raw: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = raw.split('.').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

fn log_failure(what: &str, output: &CommandOutput) {
    if !output.is_success() {
        debug!(status = ?output.status, "{what} command did not succeed, parsing captured output anyway");
    }
}
