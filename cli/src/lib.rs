//! Executable external fact for Munki.
//!
//! # Overview
//! Resolves the Munki facts on the running host and prints them as a single
//! JSON object, the document Facter reads from an executable external fact.
//! Facts confined out on this host are left out, so a non-macOS host prints
//! `{}`.
//!
//! # Design
//! `run` takes the executor as a parameter so tests drive it without
//! spawning the real tools. Logs go to stderr; stdout carries only the
//! fact document.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use munki_facts_core::config::{DEFAULT_DEFAULTS_BIN, DEFAULT_MSU_BIN, DEFAULT_PREFERENCES};
use munki_facts_core::{CommandExecutor, Fact, FactRegistry, FactsConfig, HostInfo};

#[derive(Debug, Parser)]
#[command(name = "munki-facts", version, about = "Print Munki inventory facts as JSON")]
pub struct Cli {
    /// Resolve only this fact (repeatable). Defaults to every fact.
    #[arg(long = "fact", value_name = "NAME")]
    pub facts: Vec<String>,

    /// Pretty-print the JSON document.
    #[arg(long)]
    pub pretty: bool,

    /// Kernel name to confine against instead of the running host's.
    #[arg(long, env = "MUNKI_FACTS_KERNEL")]
    pub kernel: Option<String>,

    /// Preference reader used for munki_http_headers.
    #[arg(long, env = "MUNKI_FACTS_DEFAULTS_BIN", default_value = DEFAULT_DEFAULTS_BIN)]
    pub defaults_bin: String,

    /// Preference domain holding AdditionalHttpHeaders.
    #[arg(long, env = "MUNKI_FACTS_PREFERENCES", default_value = DEFAULT_PREFERENCES)]
    pub preferences: String,

    /// managedsoftwareupdate binary used for munki_client_version.
    #[arg(long, env = "MUNKI_FACTS_MSU_BIN", default_value = DEFAULT_MSU_BIN)]
    pub msu_bin: String,

    /// Log filter for stderr, e.g. `debug` or `munki_facts_core=trace`.
    /// Falls back to RUST_LOG, then `warn`.
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn config(&self) -> FactsConfig {
        FactsConfig::default()
            .with_defaults_bin(&self.defaults_bin)
            .with_preferences(&self.preferences)
            .with_msu_bin(&self.msu_bin)
    }

    pub fn host(&self) -> HostInfo {
        match &self.kernel {
            Some(kernel) => HostInfo::new(kernel.as_str()),
            None => HostInfo::current(),
        }
    }
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve the requested facts and render the JSON document.
pub fn run(cli: &Cli, executor: &dyn CommandExecutor) -> Result<String> {
    let registry = FactRegistry::new(cli.config());
    let selected = if cli.facts.is_empty() {
        registry.facts().to_vec()
    } else {
        cli.facts
            .iter()
            .map(|name| registry.lookup(name))
            .collect::<Result<Vec<Fact>, _>>()?
    };

    let host = cli.host();
    debug!(kernel = %host.kernel, facts = selected.len(), "resolving facts");
    let set = registry.resolve_selected(&selected, &host, executor);

    let json = if cli.pretty {
        set.to_json_pretty()
    } else {
        set.to_json()
    };
    json.context("failed to render facts")
}

#[cfg(test)]
mod tests {
    use munki_facts_core::{CommandOutput, CommandRequest};

    use super::*;

    /// Answers every command with the same stdout.
    struct Canned(&'static str);

    impl CommandExecutor for Canned {
        fn run(&self, _request: &CommandRequest) -> CommandOutput {
            CommandOutput::success(self.0)
        }
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("munki-facts").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_stock_install() {
        let cli = parse(&["--kernel", "Darwin"]);
        assert_eq!(cli.config(), FactsConfig::default());
        assert!(cli.facts.is_empty());
    }

    #[test]
    fn path_flags_override_config() {
        let cli = parse(&["--msu-bin", "/opt/msu", "--defaults-bin", "/opt/defaults"]);
        let config = cli.config();
        assert_eq!(config.msu_bin, "/opt/msu");
        assert_eq!(config.defaults_bin, "/opt/defaults");
    }

    #[test]
    fn selected_fact_only() {
        let cli = parse(&["--kernel", "Darwin", "--fact", "munki_client_version"]);
        let json: serde_json::Value = serde_json::from_str(&run(&cli, &Canned("5.5.1")).unwrap()).unwrap();
        assert_eq!(json["munki_client_version"]["patch"], "1");
        assert!(json.get("munki_http_headers").is_none());
    }

    #[test]
    fn unknown_fact_is_an_error() {
        let cli = parse(&["--kernel", "Darwin", "--fact", "munki_catalogs"]);
        let err = run(&cli, &Canned("")).unwrap_err();
        assert!(err.to_string().contains("munki_catalogs"));
    }

    #[test]
    fn confined_host_prints_empty_object() {
        let cli = parse(&["--kernel", "Linux"]);
        assert_eq!(run(&cli, &Canned("5.5.1")).unwrap(), "{}");
    }
}
