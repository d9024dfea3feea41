//! Munki inventory facts for a host fact-collection agent.
//!
//! # Overview
//! Two facts, both confined to macOS (`Darwin`) hosts:
//! - `munki_http_headers`: the `AdditionalHttpHeaders` list from the
//!   `ManagedInstalls` preference domain.
//! - `munki_client_version`: the `managedsoftwareupdate --version` string,
//!   split into major, minor and patch.
//!
//! # Design
//! - `MunkiFacts` builds `CommandRequest` values and parses `CommandOutput`
//!   values without spawning anything (host-does-IO pattern).
//! - `FactRegistry` applies confinement and drives a `CommandExecutor`;
//!   `SystemExecutor` is the `std::process` implementation.
//! - Failures never surface from a fact. A command that is missing or exits
//!   non-zero is parsed from whatever it printed.

pub mod command;
pub mod config;
pub mod confine;
pub mod error;
pub mod executor;
pub mod facts;
pub mod registry;
pub mod types;

pub use command::{CommandOutput, CommandRequest};
pub use config::FactsConfig;
pub use confine::{Confinement, HostInfo};
pub use error::FactError;
pub use executor::{CommandExecutor, SystemExecutor};
pub use facts::MunkiFacts;
pub use registry::{Fact, FactRegistry};
pub use types::{FactSet, FactValue, HeaderList, VersionInfo};
