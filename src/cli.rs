use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "cchistory")]
#[command(about = "Print repositories, branches and commit histories of an AWS CodeCommit account")]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Environment file to load before reading credentials (default: ./.env if present)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Service region (overrides config and AWS_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Service endpoint URL (overrides config)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Walk only each repository's default branch
    #[arg(long)]
    pub only_default_branch: bool,

    /// Print each commit at most once per branch walk
    #[arg(long)]
    pub dedup_ancestors: bool,

    /// Clone one repository and print its log instead of querying the service
    #[arg(long)]
    pub local_clone: bool,

    /// Repository to clone with --local-clone (overrides config)
    #[arg(long)]
    pub clone_repository: Option<String>,

    /// Full clone URL for --local-clone (overrides config and --clone-repository)
    #[arg(long)]
    pub clone_url: Option<String>,

    /// Write the default configuration file and exit
    #[arg(long)]
    pub init_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let args = CliArgs::parse_from(["cchistory"]);
        assert_eq!(args, CliArgs::default());
    }

    #[test]
    fn test_cli_parse_remote_flags() {
        let args = CliArgs::parse_from([
            "cchistory",
            "--region", "eu-west-1",
            "--only-default-branch",
            "--dedup-ancestors",
            "--config", "/custom/config.toml",
        ]);
        assert_eq!(args.region.as_deref(), Some("eu-west-1"));
        assert!(args.only_default_branch);
        assert!(args.dedup_ancestors);
        assert!(!args.local_clone);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_cli_parse_local_clone() {
        let args = CliArgs::parse_from([
            "cchistory",
            "--local-clone",
            "--clone-repository", "kellie1",
            "--env-file", "/tmp/creds.env",
        ]);
        assert!(args.local_clone);
        assert_eq!(args.clone_repository.as_deref(), Some("kellie1"));
        assert_eq!(args.env_file, Some(PathBuf::from("/tmp/creds.env")));
    }
}
