use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{ChangelogError, Result};

#[derive(Debug, Deserialize)]
pub struct GraphqlErrorMessage {
    pub message: String,
}

/// Envelope of every GraphQL response. `data` may be null when `errors` is
/// populated.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorMessage>,
}

impl<T> GraphqlResponse<T> {
    pub fn into_data(self) -> Result<Option<T>> {
        if !self.errors.is_empty() {
            return Err(ChangelogError::graphql(
                self.errors.iter().map(|e| e.message.as_str()),
            ));
        }
        Ok(self.data)
    }
}

pub const LABELS_QUERY: &str = r#"
query GetLabels($owner: String!, $repo: String!, $limit: Int!) {
  repository(owner: $owner, name: $repo) {
    labels(first: $limit) {
      nodes {
        id
        name
      }
    }
  }
}"#;

#[derive(Debug, Serialize)]
pub struct LabelsQueryVariables {
    pub owner: String,
    pub repo: String,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct LabelNode {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LabelConnection {
    #[serde(default)]
    pub nodes: Vec<LabelNode>,
}

#[derive(Debug, Deserialize)]
pub struct LabelsRepository {
    pub labels: Option<LabelConnection>,
}

#[derive(Debug, Deserialize)]
pub struct LabelsData {
    pub repository: Option<LabelsRepository>,
}

pub const LAST_RELEASE_QUERY: &str = r#"
query GetLastRelease($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    releases(first: 1, orderBy: { field: CREATED_AT, direction: DESC }) {
      nodes {
        publishedAt
        tagName
      }
    }
  }
}"#;

#[derive(Debug, Serialize)]
pub struct LastReleaseQueryVariables {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseNode {
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "tagName")]
    pub tag_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseConnection {
    #[serde(default)]
    pub nodes: Vec<ReleaseNode>,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseRepository {
    pub releases: Option<ReleaseConnection>,
}

#[derive(Debug, Deserialize)]
pub struct LastReleaseData {
    pub repository: Option<ReleaseRepository>,
}

pub const MERGED_PRS_QUERY: &str = r#"
query SearchMergedPullRequests($query: String!, $limit: Int!, $labelLimit: Int!) {
  search(query: $query, type: ISSUE, first: $limit) {
    nodes {
      ... on PullRequest {
        id
        number
        title
        url
        createdAt
        labels(first: $labelLimit) {
          nodes {
            name
          }
        }
        author {
          login
        }
      }
    }
  }
}"#;

#[derive(Debug, Serialize)]
pub struct MergedPrsQueryVariables {
    pub query: String,
    pub limit: u32,
    #[serde(rename = "labelLimit")]
    pub label_limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct PrLabelNode {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PrLabelConnection {
    #[serde(default)]
    pub nodes: Vec<PrLabelNode>,
}

#[derive(Debug, Deserialize)]
pub struct PrAuthor {
    pub login: String,
}

/// Search hits are untyped unions: anything that is not a pull request
/// comes back as an empty object.
#[derive(Debug, Deserialize)]
pub struct PrSearchNode {
    pub id: Option<String>,
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    pub labels: Option<PrLabelConnection>,
    pub author: Option<PrAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct PrSearchConnection {
    #[serde(default)]
    pub nodes: Vec<PrSearchNode>,
}

#[derive(Debug, Deserialize)]
pub struct MergedPrsData {
    pub search: Option<PrSearchConnection>,
}

pub const ADD_COMMENT_MUTATION: &str = r#"
mutation AddPullRequestComment($subjectId: ID!, $body: String!) {
  addComment(input: { subjectId: $subjectId, body: $body }) {
    commentEdge {
      node {
        id
      }
    }
  }
}"#;

#[derive(Debug, Serialize)]
pub struct AddCommentVariables {
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentNode {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentEdge {
    pub node: CommentNode,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentPayload {
    #[serde(rename = "commentEdge")]
    pub comment_edge: Option<CommentEdge>,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentData {
    #[serde(rename = "addComment")]
    pub add_comment: Option<AddCommentPayload>,
}

pub const ADD_LABELS_MUTATION: &str = r#"
mutation AddLabelsToPullRequest($labelableId: ID!, $labelIds: [ID!]!) {
  addLabelsToLabelable(input: { labelableId: $labelableId, labelIds: $labelIds }) {
    clientMutationId
  }
}"#;

#[derive(Debug, Serialize)]
pub struct AddLabelsVariables {
    #[serde(rename = "labelableId")]
    pub labelable_id: String,
    #[serde(rename = "labelIds")]
    pub label_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddLabelsData {
    #[serde(rename = "addLabelsToLabelable")]
    pub add_labels_to_labelable: Option<serde_json::Value>,
}

/// Search string selecting merged pull requests of a repository in
/// ascending creation order, optionally created at or after `since`.
pub fn merged_pr_search_query(
    owner: &str,
    repo: &str,
    since: Option<&DateTime<Utc>>,
) -> String {
    let mut query =
        format!("repo:{owner}/{repo} is:pr is:merged sort:created-asc");

    if let Some(since) = since {
        query.push_str(&format!(
            " created:>={}",
            since.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn search_query_without_release_date() {
        let query = merged_pr_search_query("acme", "widgets", None);
        assert_eq!(query, "repo:acme/widgets is:pr is:merged sort:created-asc");
    }

    #[test]
    fn search_query_with_release_date() {
        let since = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let query = merged_pr_search_query("acme", "widgets", Some(&since));
        assert_eq!(
            query,
            "repo:acme/widgets is:pr is:merged sort:created-asc created:>=2024-03-01T12:30:00Z"
        );
    }

    #[test]
    fn variables_use_graphql_names() {
        let vars = AddCommentVariables {
            subject_id: "PR_1".into(),
            body: "hello".into(),
        };
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json["subjectId"], "PR_1");
        assert_eq!(json["body"], "hello");

        let vars = MergedPrsQueryVariables {
            query: "repo:a/b".into(),
            limit: 30,
            label_limit: 100,
        };
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json["labelLimit"], 100);
    }

    #[test]
    fn errors_array_becomes_graphql_error() {
        let raw = r#"{
          "data": null,
          "errors": [{ "message": "Could not resolve to a Repository with the name 'acme/nope'." }]
        }"#;
        let response: GraphqlResponse<LabelsData> =
            serde_json::from_str(raw).unwrap();
        let err = response.into_data().unwrap_err();
        assert!(matches!(err, ChangelogError::GraphqlError(_)));
        assert!(err.to_string().contains("acme/nope"));
    }

    #[test]
    fn labels_response_with_null_repository() {
        let raw = r#"{ "data": { "repository": null } }"#;
        let response: GraphqlResponse<LabelsData> =
            serde_json::from_str(raw).unwrap();
        let data = response.into_data().unwrap().unwrap();
        assert!(data.repository.is_none());
    }

    #[test]
    fn release_response_parses_timestamps() {
        let raw = r#"{
          "data": {
            "repository": {
              "releases": {
                "nodes": [{ "publishedAt": "2024-03-01T12:30:00Z", "tagName": "v1.2.0" }]
              }
            }
          }
        }"#;
        let response: GraphqlResponse<LastReleaseData> =
            serde_json::from_str(raw).unwrap();
        let data = response.into_data().unwrap().unwrap();
        let node = &data.repository.unwrap().releases.unwrap().nodes[0];
        assert_eq!(
            node.published_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(node.tag_name.as_deref(), Some("v1.2.0"));
    }

    #[test]
    fn search_response_tolerates_non_pull_request_nodes() {
        let raw = r#"{
          "data": {
            "search": {
              "nodes": [
                {},
                {
                  "id": "PR_kwDOA",
                  "number": 7,
                  "title": "Fix parser",
                  "url": "https://github.com/acme/widgets/pull/7",
                  "createdAt": "2024-03-02T08:00:00Z",
                  "labels": { "nodes": [{ "name": "bug" }] },
                  "author": null
                }
              ]
            }
          }
        }"#;
        let response: GraphqlResponse<MergedPrsData> =
            serde_json::from_str(raw).unwrap();
        let nodes = response.into_data().unwrap().unwrap().search.unwrap().nodes;
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].id.is_none());
        assert_eq!(nodes[1].id.as_deref(), Some("PR_kwDOA"));
        assert!(nodes[1].author.is_none());
    }
}
