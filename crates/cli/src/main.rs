mod ask;
mod cli;
mod ingest;
mod terminal;

use std::process::ExitCode;

use amanah_core::config::load_dotenv;
use amanah_core::Config;
use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tracing::error;

use crate::cli::{CliArgs, Command};
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    // Usage errors exit with 1 rather than clap's default of 2.
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    config.log_summary();

    let terminal = Terminal::new();
    let result = match args.command {
        Command::Ingest(ingest_args) => ingest::run(ingest_args, &config, &terminal).await,
        Command::Ask(ask_args) => ask::run(ask_args, &config, &terminal).await,
        Command::Config => print_config(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "command failed");
            let _ = terminal.print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn print_config(config: &Config) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
    let profiles = Config::available_profiles();
    if profiles.len() > 1 {
        println!("available profiles: {}", profiles.join(", "));
    }
    Ok(ExitCode::SUCCESS)
}
