use anyhow::{Context, Result};
use cchistory_core::app::{BranchMode, WalkOptions};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::adapters::clone::{codecommit_clone_url, GitCredentials};
use crate::adapters::sigv4::Credentials;
use crate::cli::CliArgs;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Config {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub only_default_branch: bool,
    #[serde(default)]
    pub dedup_ancestors: bool,
    #[serde(default)]
    pub clone: CloneConfig,
}

/// Target of the local-clone walk
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CloneConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            region: None,
            endpoint: None,
            only_default_branch: false,
            dedup_ancestors: false,
            clone: CloneConfig::default(),
        }
    }
}

pub fn get_default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "cchistory")
        .context("Failed to determine project directories")?;

    let config_dir = proj_dirs.config_dir();
    Ok(config_dir.join("cchistory.toml"))
}

impl Config {
    /// Read the config file; a missing file yields defaults and is not created
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p,
            None => get_default_config_path()?,
        };

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn from_cli_and_file(cli_args: &CliArgs, config_path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load(config_path)?;

        // CLI args override config file
        if let Some(region) = &cli_args.region {
            config.region = Some(region.clone());
        }
        if let Some(endpoint) = &cli_args.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if cli_args.only_default_branch {
            config.only_default_branch = true;
        }
        if cli_args.dedup_ancestors {
            config.dedup_ancestors = true;
        }
        if let Some(repository) = &cli_args.clone_repository {
            config.clone.repository = Some(repository.clone());
        }
        if let Some(url) = &cli_args.clone_url {
            config.clone.url = Some(url.clone());
        }

        Ok(config)
    }

    /// Region from config, then the environment, then the built-in default
    pub fn resolved_region(&self, env_region: Option<&str>) -> String {
        self.region
            .as_deref()
            .or(env_region.filter(|r| !r.is_empty()))
            .unwrap_or(DEFAULT_REGION)
            .to_string()
    }

    pub fn branch_mode(&self) -> BranchMode {
        if self.only_default_branch {
            BranchMode::DefaultOnly
        } else {
            BranchMode::All
        }
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            dedup_ancestors: self.dedup_ancestors,
        }
    }

    /// URL for the local-clone walk; an explicit URL wins over a repository name
    pub fn clone_url(&self, region: &str) -> Result<String> {
        if let Some(url) = &self.clone.url {
            return Ok(url.clone());
        }
        self.clone
            .repository
            .as_deref()
            .map(|name| codecommit_clone_url(region, name))
            .context("No repository to clone: set clone.repository or clone.url, or pass --clone-repository")
    }
}

/// Secrets and settings taken from the process environment.
///
/// Absent variables become empty strings; the service rejects them itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub aws: Credentials,
    pub git: GitCredentials,
    pub region: Option<String>,
}

impl Environment {
    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key_id = lookup("AWS_ACCESS_KEY")
            .filter(|v| !v.is_empty())
            .or_else(|| lookup("AWS_ACCESS_KEY_ID"))
            .unwrap_or_default();

        Self {
            aws: Credentials {
                access_key_id,
                secret_access_key: lookup("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
                session_token: lookup("AWS_SESSION_TOKEN").filter(|v| !v.is_empty()),
            },
            git: GitCredentials {
                username: lookup("GIT_USERNAME").unwrap_or_default(),
                access_token: lookup("GIT_ACCESS_TOKEN").unwrap_or_default(),
            },
            region: lookup("AWS_REGION"),
        }
    }
}

/// Load an environment file into the process environment.
///
/// An explicit path must exist; the default `.env` is optional.
pub fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("Failed to load environment file: {}", path.display()))?;
        }
        None => match dotenv::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded environment file"),
            Err(dotenv::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no .env file found")
            }
            Err(err) => return Err(err).context("Failed to load .env file"),
        },
    }
    Ok(())
}
