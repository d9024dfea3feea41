//! Error types for fact resolution plumbing.
//!
//! # Design
//! The probes themselves never fail: a missing binary, a non-zero exit and an
//! empty result all reach the parser as whatever stdout was captured. These
//! variants cover the code around the probes: spawning a process when the
//! caller asks for the fallible form, looking a fact up by name, and turning
//! resolved values into JSON.

use thiserror::Error;

/// Errors returned by the executor, the registry and fact serialization.
#[derive(Debug, Error)]
pub enum FactError {
    /// The process could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// No fact is registered under this name.
    #[error("unknown fact: {0}")]
    UnknownFact(String),

    /// A resolved value could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
