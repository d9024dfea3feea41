//! Values contributed by facts.
//!
//! # Design
//! `FactValue` is untagged so each fact serializes to the shape an inventory
//! consumer expects: a JSON array for the header list, a JSON object for the
//! version record. `FactSet` keeps fact names ordered, which makes the
//! emitted document stable across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FactError;

/// HTTP headers configured for the Munki client, one `"Name: value"` per entry.
pub type HeaderList = Vec<String>;

/// The Munki client version, split on `.`.
///
/// Components are kept as strings; nothing checks that they are numeric.
/// A component that the raw string does not have is `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionInfo {
    pub full: String,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub patch: Option<String>,
}

/// The value a single fact resolves to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FactValue {
    Headers(HeaderList),
    Version(VersionInfo),
}

impl FactValue {
    pub fn to_json(&self) -> Result<String, FactError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Facts resolved on one host, keyed by fact name.
///
/// Facts confined out on this host are simply missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FactSet {
    values: BTreeMap<String, FactValue>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FactValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FactValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> Result<String, FactError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, FactError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
