mod cli;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let options = cli.options();
    tracing::debug!(?options, input = %cli.input.display(), "starting");

    pb_typeddict::compile(&cli.input, cli.output.as_deref(), &options)
        .with_context(|| format!("cannot generate types for {}", cli.input.display()))?;
    Ok(())
}
