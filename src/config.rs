//! Configuration loading and parsing for `pr-changelog.toml` files.
//!
//! Every field is optional; command line flags override file values.
use log::*;
use serde::Deserialize;
use std::path::Path;

use crate::{
    ChangelogError, Result,
    changelog::DEFAULT_BODY,
    forge::config::{
        DEFAULT_COMMENT, DEFAULT_LABEL_LIMIT, DEFAULT_PR_LIMIT, MARKER_LABEL,
        MAX_PAGE_SIZE,
    },
    orchestrator::RunOptions,
};

/// Default configuration filename, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pr-changelog.toml";

/// Changelog template configuration using Tera syntax.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Main changelog body template.
    pub body: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            body: DEFAULT_BODY.into(),
        }
    }
}

/// Root configuration structure for `pr-changelog.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Label marking pull requests that were already processed.
    pub marker_label: String,
    /// Apply the marker label when marking a pull request (default: true).
    pub apply_marker_label: bool,
    /// Maximum number of repository labels to look up.
    pub label_limit: u32,
    /// Maximum number of merged pull requests to collect.
    pub pr_limit: u32,
    /// Comment posted on every processed pull request.
    pub comment: String,
    /// Changelog rendering settings.
    pub changelog: ChangelogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker_label: MARKER_LABEL.into(),
            apply_marker_label: true,
            label_limit: DEFAULT_LABEL_LIMIT,
            pr_limit: DEFAULT_PR_LIMIT,
            comment: DEFAULT_COMMENT.into(),
            changelog: ChangelogConfig::default(),
        }
    }
}

fn validate_limit(name: &str, value: u32) -> Result<()> {
    if value == 0 || value > MAX_PAGE_SIZE {
        return Err(ChangelogError::invalid_config(format!(
            "{name} must be between 1 and {MAX_PAGE_SIZE}, got {value}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from `path`. Without an explicit path the default
    /// file is used when present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if !default_path.exists() {
                    info!("no configuration found: using default");
                    return Ok(Config::default());
                }
                default_path
            }
        };

        if !path.exists() {
            return Err(ChangelogError::invalid_config(format!(
                "config file does not exist: {}",
                path.display()
            )));
        }

        info!("loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_limit("label_limit", self.label_limit)?;
        validate_limit("pr_limit", self.pr_limit)?;

        if self.marker_label.trim().is_empty() {
            return Err(ChangelogError::invalid_config(
                "marker_label must not be empty",
            ));
        }

        Ok(())
    }

    /// Validated options for one pipeline run.
    pub fn run_options(&self) -> Result<RunOptions> {
        self.validate()?;

        RunOptions::builder()
            .label_limit(self.label_limit)
            .pr_limit(self.pr_limit)
            .marker_label(self.marker_label.as_str())
            .apply_marker_label(self.apply_marker_label)
            .comment(self.comment.as_str())
            .changelog_template(self.changelog.body.as_str())
            .build()
    }
}
