use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use calm_cli::commands::{buffers, stress};
use calm_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON on stdout stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Stress {
            events,
            period,
            date,
            daily,
            json,
        } => {
            stress::run(
                &mut out,
                events,
                (*period).into(),
                date.as_deref(),
                *daily,
                *json,
                &config,
            )?;
        }
        Commands::Buffers { events, json } => {
            buffers::run(&mut out, events, *json, &config)?;
        }
    }

    Ok(())
}
