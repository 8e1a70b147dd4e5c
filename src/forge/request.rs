use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Repository label. Names are unique within a repository.
pub struct Label {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Most recently created release, both fields absent when the repository
/// has never published one.
pub struct LastRelease {
    pub published_at: Option<DateTime<Utc>>,
    pub tag_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Merged pull request as returned by the forge.
pub struct PullRequest {
    /// Opaque node id used as the subject of comments and labels
    pub id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Label names in platform order
    pub labels: Vec<String>,
    pub author: Option<Author>,
}

impl PullRequest {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Lower bound for the merged pull request search.
pub struct SearchOptions {
    pub last_release_date: Option<DateTime<Utc>>,
    pub last_release_tag: Option<String>,
}

impl From<LastRelease> for SearchOptions {
    fn from(release: LastRelease) -> Self {
        Self {
            last_release_date: release.published_at,
            last_release_tag: release.tag_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to list merged pull requests.
pub struct MergedPrsRequest {
    pub search: SearchOptions,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to post a comment on a pull request.
pub struct AddCommentRequest {
    pub subject_id: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to add existing labels to a pull request.
pub struct AddLabelsRequest {
    pub labelable_id: String,
    pub label_ids: Vec<String>,
}
