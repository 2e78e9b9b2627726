use std::process::ExitCode;
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use mixin_lang::{Config, RunError};

fn main() -> ExitCode {
    let config: Config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if config.verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match mixin_lang::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Syntax(_)) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        },
    }
}
