//! Fact registration and resolution.
//!
//! # Design
//! Each `Fact` pairs a name with a `Confinement` and a build/parse pair on
//! `MunkiFacts`. The registry checks confinement before anything else, so a
//! fact confined out on this host never builds or runs its command. Nothing
//! is cached; every resolution runs the command again.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::command::{CommandOutput, CommandRequest};
use crate::config::FactsConfig;
use crate::confine::{Confinement, HostInfo, DARWIN};
use crate::error::FactError;
use crate::executor::CommandExecutor;
use crate::facts::MunkiFacts;
use crate::types::{FactSet, FactValue};

/// The facts this crate provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fact {
    MunkiHttpHeaders,
    MunkiClientVersion,
}

impl Fact {
    /// Every fact, in registration order.
    pub const ALL: [Fact; 2] = [Fact::MunkiHttpHeaders, Fact::MunkiClientVersion];

    pub fn name(self) -> &'static str {
        match self {
            Fact::MunkiHttpHeaders => "munki_http_headers",
            Fact::MunkiClientVersion => "munki_client_version",
        }
    }

    pub fn confinement(self) -> Confinement {
        match self {
            Fact::MunkiHttpHeaders | Fact::MunkiClientVersion => Confinement::kernel(DARWIN),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Fact {
    type Err = FactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fact::ALL
            .into_iter()
            .find(|fact| fact.name() == s)
            .ok_or_else(|| FactError::UnknownFact(s.to_string()))
    }
}

/// Resolves registered facts against a host through a `CommandExecutor`.
#[derive(Debug, Clone)]
pub struct FactRegistry {
    facts: MunkiFacts,
    registered: Vec<Fact>,
}

impl Default for FactRegistry {
    fn default() -> Self {
        Self::new(FactsConfig::default())
    }
}

impl FactRegistry {
    pub fn new(config: FactsConfig) -> Self {
        Self {
            facts: MunkiFacts::new(config),
            registered: Fact::ALL.to_vec(),
        }
    }

    pub fn facts(&self) -> &[Fact] {
        &self.registered
    }

    /// Look up a registered fact by name.
    pub fn lookup(&self, name: &str) -> Result<Fact, FactError> {
        let fact: Fact = name.parse()?;
        if self.registered.contains(&fact) {
            Ok(fact)
        } else {
            Err(FactError::UnknownFact(name.to_string()))
        }
    }

    pub fn applies_to(&self, fact: Fact, host: &HostInfo) -> bool {
        fact.confinement().allows(host)
    }

    pub fn build_request(&self, fact: Fact) -> CommandRequest {
        match fact {
            Fact::MunkiHttpHeaders => self.facts.build_http_headers(),
            Fact::MunkiClientVersion => self.facts.build_client_version(),
        }
    }

    pub fn parse_output(&self, fact: Fact, output: &CommandOutput) -> FactValue {
        match fact {
            Fact::MunkiHttpHeaders => FactValue::Headers(self.facts.parse_http_headers(output)),
            Fact::MunkiClientVersion => FactValue::Version(self.facts.parse_client_version(output)),
        }
    }

    /// Resolve one fact, or `None` when it is confined out on `host`.
    pub fn resolve(
        &self,
        fact: Fact,
        host: &HostInfo,
        executor: &dyn CommandExecutor,
    ) -> Option<FactValue> {
        if !self.applies_to(fact, host) {
            debug!(%fact, kernel = %host.kernel, "fact confined out on this host");
            return None;
        }
        let request = self.build_request(fact);
        let output = executor.run(&request);
        Some(self.parse_output(fact, &output))
    }

    /// Resolve the given facts, skipping those confined out on `host`.
    pub fn resolve_selected(
        &self,
        selected: &[Fact],
        host: &HostInfo,
        executor: &dyn CommandExecutor,
    ) -> FactSet {
        let mut set = FactSet::new();
        for &fact in selected {
            if let Some(value) = self.resolve(fact, host, executor) {
                set.insert(fact.name(), value);
            }
        }
        set
    }

    pub fn resolve_all(&self, host: &HostInfo, executor: &dyn CommandExecutor) -> FactSet {
        self.resolve_selected(&self.registered, host, executor)
    }
}
