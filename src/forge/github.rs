//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use secrecy::ExposeSecret;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    ChangelogError, Result,
    forge::{
        config::{PR_LABEL_PAGE_SIZE, RemoteConfig},
        request::{
            AddCommentRequest, AddLabelsRequest, Author, Label, LastRelease,
            MergedPrsRequest, PullRequest,
        },
        traits::Forge,
    },
};

pub mod graphql;

use graphql::{
    ADD_COMMENT_MUTATION, ADD_LABELS_MUTATION, AddCommentData,
    AddCommentVariables, AddLabelsData, AddLabelsVariables, GraphqlResponse,
    LABELS_QUERY, LAST_RELEASE_QUERY, LabelsData, LabelsQueryVariables,
    LastReleaseData, LastReleaseQueryVariables, MERGED_PRS_QUERY,
    MergedPrsData, MergedPrsQueryVariables, PrSearchNode,
    merged_pr_search_query,
};

/// GitHub forge implementation talking to the GraphQL API through Octocrab.
pub struct Github {
    config: RemoteConfig,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration. An empty token yields an anonymous client.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let mut builder =
            Octocrab::builder().base_uri(config.api_url.clone())?;

        if config.token.expose_secret().is_empty() {
            warn!("no access token configured: using anonymous client");
        } else {
            builder = builder.personal_token(config.token.clone());
        }

        let instance = builder.build()?;

        Ok(Self { config, instance })
    }

    async fn graphql<T, V>(&self, query: &str, variables: V) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        let json = serde_json::json!({
          "query": query,
          "variables": variables,
        });

        let response: GraphqlResponse<T> = self.instance.graphql(&json).await?;

        response.into_data()
    }
}

fn to_pull_request(node: PrSearchNode) -> Option<PullRequest> {
    let id = node.id?;

    Some(PullRequest {
        id,
        number: node.number,
        title: node.title,
        url: node.url,
        created_at: node.created_at,
        labels: node
            .labels
            .map(|c| c.nodes.into_iter().map(|l| l.name).collect())
            .unwrap_or_default(),
        author: node.author.map(|a| Author { login: a.login }),
    })
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn list_labels(&self, limit: u32) -> Result<Vec<Label>> {
        let vars = LabelsQueryVariables {
            owner: self.config.owner.clone(),
            repo: self.config.repo.clone(),
            limit,
        };

        let data: Option<LabelsData> = self.graphql(LABELS_QUERY, vars).await?;

        let labels = data
            .and_then(|d| d.repository)
            .and_then(|r| r.labels)
            .map(|c| {
                c.nodes
                    .into_iter()
                    .map(|n| Label {
                        id: n.id,
                        name: n.name,
                    })
                    .collect::<Vec<Label>>()
            })
            .unwrap_or_default();

        Ok(labels)
    }

    async fn get_last_release(&self) -> Result<LastRelease> {
        let vars = LastReleaseQueryVariables {
            owner: self.config.owner.clone(),
            repo: self.config.repo.clone(),
        };

        let data: Option<LastReleaseData> =
            self.graphql(LAST_RELEASE_QUERY, vars).await?;

        let node = data
            .and_then(|d| d.repository)
            .and_then(|r| r.releases)
            .and_then(|c| c.nodes.into_iter().next());

        Ok(node
            .map(|n| LastRelease {
                published_at: n.published_at,
                tag_name: n.tag_name,
            })
            .unwrap_or_default())
    }

    async fn get_merged_prs(
        &self,
        req: MergedPrsRequest,
    ) -> Result<Vec<PullRequest>> {
        let query = merged_pr_search_query(
            &self.config.owner,
            &self.config.repo,
            req.search.last_release_date.as_ref(),
        );

        debug!("searching pull requests: {query}");

        let vars = MergedPrsQueryVariables {
            query,
            limit: req.limit,
            label_limit: PR_LABEL_PAGE_SIZE,
        };

        let data: Option<MergedPrsData> =
            self.graphql(MERGED_PRS_QUERY, vars).await?;

        let prs = data
            .and_then(|d| d.search)
            .map(|s| {
                s.nodes
                    .into_iter()
                    .filter_map(to_pull_request)
                    .collect::<Vec<PullRequest>>()
            })
            .unwrap_or_default();

        Ok(prs)
    }

    async fn add_comment(&self, req: AddCommentRequest) -> Result<String> {
        let vars = AddCommentVariables {
            subject_id: req.subject_id.clone(),
            body: req.body,
        };

        let data: Option<AddCommentData> =
            self.graphql(ADD_COMMENT_MUTATION, vars).await?;

        data.and_then(|d| d.add_comment)
            .and_then(|p| p.comment_edge)
            .map(|e| e.node.id)
            .ok_or_else(|| {
                ChangelogError::forge(format!(
                    "no comment id returned for subject: {}",
                    req.subject_id
                ))
            })
    }

    async fn add_labels(&self, req: AddLabelsRequest) -> Result<()> {
        let vars = AddLabelsVariables {
            labelable_id: req.labelable_id.clone(),
            label_ids: req.label_ids,
        };

        let data: Option<AddLabelsData> =
            self.graphql(ADD_LABELS_MUTATION, vars).await?;

        if data.and_then(|d| d.add_labels_to_labelable).is_none() {
            return Err(ChangelogError::forge(format!(
                "failed to add labels to: {}",
                req.labelable_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql::{PrAuthor, PrLabelConnection, PrLabelNode};

    #[test]
    fn search_node_without_id_is_skipped() {
        let node = PrSearchNode {
            id: None,
            number: 0,
            title: "".into(),
            url: "".into(),
            created_at: None,
            labels: None,
            author: None,
        };
        assert!(to_pull_request(node).is_none());
    }

    #[test]
    fn search_node_maps_labels_and_author() {
        let node = PrSearchNode {
            id: Some("PR_1".into()),
            number: 12,
            title: "Add feature".into(),
            url: "https://github.com/acme/widgets/pull/12".into(),
            created_at: None,
            labels: Some(PrLabelConnection {
                nodes: vec![
                    PrLabelNode {
                        name: "feature".into(),
                    },
                    PrLabelNode { name: "bug".into() },
                ],
            }),
            author: Some(PrAuthor {
                login: "octocat".into(),
            }),
        };

        let pr = to_pull_request(node).unwrap();
        assert_eq!(pr.id, "PR_1");
        assert_eq!(pr.number, 12);
        assert_eq!(pr.labels, vec!["feature", "bug"]);
        assert_eq!(pr.author.unwrap().login, "octocat");
    }
}
