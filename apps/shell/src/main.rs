use anyhow::Context;
use cirrus::kernel::config::load_config;
use cirrus_logger::Logger;
use cirrus_shell::{Cli, Shell, ShellConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config: ShellConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;

    let mut log = config.log.clone();
    if cli.verbose {
        "debug".clone_into(&mut log.level);
    }
    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).settings(&log)?.init()?;

    Shell::new(config).run(&cli.command, &mut std::io::stdout().lock())
}
