use cchistory::app;
use cchistory::cli::CliArgs;
use cchistory_core::error::CoreError;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the history trace
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    info!("Starting cchistory");

    match app::run(&args) {
        Ok(outcome) => {
            info!(?outcome, "cchistory finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<CoreError>() {
                Some(core) => error!(kind = ?core.kind(), "Run failed: {}", core),
                None => error!("Run failed: {:#}", err),
            }
            println!("{}", format!("error: {:#}", err).red().bold());
            ExitCode::from(1)
        }
    }
}
