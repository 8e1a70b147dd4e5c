//! CLI argument parsing and repository/credential resolution.
use clap::Parser;
use secrecy::SecretString;
use std::{env, path::PathBuf};

use crate::{
    ChangelogError, Result,
    config::Config,
    forge::config::{DEFAULT_API_URL, RemoteConfig},
};

/// Group merged pull requests since the last release by label and mark them
/// as processed.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long)]
    /// Repository owner. Falls back to INPUT_OWNER, then GITHUB_REPOSITORY.
    pub owner: Option<String>,

    #[arg(long)]
    /// Repository name. Falls back to INPUT_REPOSITORY, then
    /// GITHUB_REPOSITORY.
    pub repo: Option<String>,

    #[arg(long, default_value = "")]
    /// Access token. Falls back to GITHUB_TOKEN, then INPUT_MY_TOKEN.
    pub token: String,

    #[arg(long, default_value = DEFAULT_API_URL)]
    /// GitHub API base URL.
    pub api_url: String,

    #[arg(long)]
    /// Path to a pr-changelog.toml configuration file.
    pub config: Option<PathBuf>,

    #[arg(long)]
    /// Maximum number of repository labels to look up (1-100).
    pub label_limit: Option<u32>,

    #[arg(long)]
    /// Maximum number of merged pull requests to collect (1-100).
    pub pr_limit: Option<u32>,

    #[arg(long)]
    /// Label marking already processed pull requests.
    pub marker_label: Option<String>,

    #[arg(long)]
    /// Comment posted on every processed pull request.
    pub comment: Option<String>,

    #[arg(long, default_value_t = false)]
    /// Log comment and label mutations instead of sending them.
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn first_non_empty<F>(
    arg: Option<&str>,
    keys: &[&str],
    lookup: &F,
) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = arg
        && !value.is_empty()
    {
        return Some(value.to_string());
    }

    keys.iter()
        .filter_map(|k| lookup(*k))
        .find(|v| !v.is_empty())
}

impl Args {
    /// Configure remote repository connection from CLI arguments and the
    /// environment.
    pub fn get_remote(&self) -> Result<RemoteConfig> {
        self.resolve_remote(&env_lookup)
    }

    fn resolve_remote<F>(&self, lookup: &F) -> Result<RemoteConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        url::Url::parse(&self.api_url)?;

        let token = first_non_empty(
            Some(self.token.as_str()),
            &["GITHUB_TOKEN", "INPUT_MY_TOKEN"],
            lookup,
        )
        .unwrap_or_default();

        let (default_owner, default_repo) = lookup("GITHUB_REPOSITORY")
            .and_then(|r| {
                r.split_once('/')
                    .map(|(o, n)| (o.to_string(), n.to_string()))
            })
            .unwrap_or_default();

        let owner =
            first_non_empty(self.owner.as_deref(), &["INPUT_OWNER"], lookup)
                .or_else(|| Some(default_owner).filter(|o| !o.is_empty()))
                .ok_or_else(|| {
                    ChangelogError::invalid_args(
                        "must configure a repository owner",
                    )
                })?;

        let repo =
            first_non_empty(self.repo.as_deref(), &["INPUT_REPOSITORY"], lookup)
                .or_else(|| Some(default_repo).filter(|r| !r.is_empty()))
                .ok_or_else(|| {
                    ChangelogError::invalid_args(
                        "must configure a repository name",
                    )
                })?;

        Ok(RemoteConfig {
            api_url: self.api_url.clone(),
            owner,
            repo,
            token: SecretString::from(token),
            dry_run: self.dry_run,
        })
    }

    /// Load the configuration file and apply command line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let config = Config::load(self.config.as_deref())?;
        Ok(self.apply_overrides(config))
    }

    fn apply_overrides(&self, config: Config) -> Config {
        Config {
            label_limit: self.label_limit.unwrap_or(config.label_limit),
            pr_limit: self.pr_limit.unwrap_or(config.pr_limit),
            marker_label: self
                .marker_label
                .clone()
                .unwrap_or(config.marker_label),
            comment: self.comment.clone().unwrap_or(config.comment),
            ..config
        }
    }
}
