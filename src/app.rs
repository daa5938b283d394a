use anyhow::Result;
use cchistory_core::app::{Enumerator, RunStats};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use crate::adapters::clone;
use crate::adapters::codecommit::HttpCodeCommit;
use crate::adapters::terminal::TerminalReporter;
use crate::cli::CliArgs;
use crate::config::{get_default_config_path, load_env_file, Config, Environment};

/// What a finished run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    ConfigWritten(PathBuf),
    Remote(RunStats),
    LocalClone { commits: usize },
}

/// Process entry: load the environment file, then run against stdout
pub fn run(args: &CliArgs) -> Result<Outcome> {
    load_env_file(args.env_file.as_deref())?;
    let env = Environment::from_process();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(args, &env, &mut out)
}

/// Run with an explicit environment and output sink
pub fn execute<W: Write>(args: &CliArgs, env: &Environment, out: &mut W) -> Result<Outcome> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_default_config_path()?,
    };

    if args.init_config {
        Config::default().save(&config_path)?;
        writeln!(out, "wrote default configuration to {}", config_path.display())?;
        return Ok(Outcome::ConfigWritten(config_path));
    }

    let config = Config::from_cli_and_file(args, Some(config_path))?;
    let region = config.resolved_region(env.region.as_deref());

    if args.local_clone {
        let url = config.clone_url(&region)?;
        info!(url = %url, "walking local clone");
        let commits = clone::clone_and_print(&url, &env.git, out)?;
        return Ok(Outcome::LocalClone { commits });
    }

    let api = HttpCodeCommit::new(&region, config.endpoint.as_deref(), env.aws.clone())?;
    info!(
        region = %region,
        endpoint = %api.endpoint(),
        mode = ?config.branch_mode(),
        "walking remote repositories"
    );

    let enumerator = Enumerator::new(&api, config.branch_mode(), config.walk_options());
    let mut reporter = TerminalReporter::new(out);
    let stats = enumerator.run(&mut reporter)?;
    Ok(Outcome::Remote(stats))
}
