//! Paths the probes read from.
//!
//! Defaults match a stock Munki install on macOS. Hosts override them to
//! point at relocated tools, and tests point them at stand-in scripts.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DEFAULTS_BIN: &str = "/usr/bin/defaults";
pub const DEFAULT_PREFERENCES: &str = "/Library/Preferences/ManagedInstalls";
pub const DEFAULT_MSU_BIN: &str = "/usr/local/munki/managedsoftwareupdate";

/// Preference key holding the extra headers Munki sends with each request.
pub const HTTP_HEADERS_KEY: &str = "AdditionalHttpHeaders";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FactsConfig {
    /// The `defaults` preference reader.
    pub defaults_bin: String,
    /// Preference domain, given as a path without the `.plist` suffix.
    pub preferences: String,
    /// The `managedsoftwareupdate` client binary.
    pub msu_bin: String,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            defaults_bin: DEFAULT_DEFAULTS_BIN.to_string(),
            preferences: DEFAULT_PREFERENCES.to_string(),
            msu_bin: DEFAULT_MSU_BIN.to_string(),
        }
    }
}

impl FactsConfig {
    pub fn with_defaults_bin(mut self, path: impl Into<String>) -> Self {
        self.defaults_bin = path.into();
        self
    }

    pub fn with_preferences(mut self, path: impl Into<String>) -> Self {
        self.preferences = path.into();
        self
    }

    pub fn with_msu_bin(mut self, path: impl Into<String>) -> Self {
        self.msu_bin = path.into();
        self
    }
}
