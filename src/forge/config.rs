//! Configuration for the GitHub connection.
use secrecy::SecretString;

/// Default GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default number of repository labels to look up.
pub const DEFAULT_LABEL_LIMIT: u32 = 100;
/// Default number of merged pull requests to collect per run.
pub const DEFAULT_PR_LIMIT: u32 = 30;
/// Largest page the GraphQL API serves for a connection.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Number of labels read per pull request.
pub const PR_LABEL_PAGE_SIZE: u32 = 100;
/// Label used to mark pull requests already included in a changelog.
pub const MARKER_LABEL: &str = "#action_internal#";
/// Comment posted on every processed pull request.
pub const DEFAULT_COMMENT: &str = "*This pull request has been included in the release changelog by the automated action.*";

/// Remote repository connection configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// API base URL (e.g. "https://api.github.com").
    pub api_url: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token, may be empty.
    pub token: SecretString,
    /// Log mutations instead of sending them.
    pub dry_run: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            token: SecretString::from("".to_string()),
            dry_run: false,
        }
    }
}

impl RemoteConfig {
    /// "owner/repo" form used in logs and search qualifiers.
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
