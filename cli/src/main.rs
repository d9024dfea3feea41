use clap::Parser;

use munki_facts::{init_logging, run, Cli};
use munki_facts_core::SystemExecutor;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    let document = run(&cli, &SystemExecutor::new())?;
    println!("{document}");
    Ok(())
}
