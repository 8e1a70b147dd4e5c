//! The changelog pipeline: label lookup, release anchor, pull request
//! collection, grouping and marking, run once from top to bottom.
use chrono::{DateTime, Local};
use derive_builder::Builder;
use log::*;

use crate::{
    ChangelogError, Result,
    changelog::{self, DEFAULT_BODY},
    forge::{
        config::{
            DEFAULT_COMMENT, DEFAULT_LABEL_LIMIT, DEFAULT_PR_LIMIT,
            MARKER_LABEL,
        },
        manager::ForgeManager,
        request::{
            Label, LastRelease, MergedPrsRequest, PullRequest, SearchOptions,
        },
    },
};

pub mod group;
pub mod marker;

use group::GroupedResult;
use marker::ProcessedMarker;

/// Format of the completion time published as the `time` output.
pub const COMPLETION_TIME_FORMAT: &str = "%H:%M:%S GMT%z";

#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct RunOptions {
    #[builder(default = "DEFAULT_LABEL_LIMIT")]
    pub label_limit: u32,
    #[builder(default = "DEFAULT_PR_LIMIT")]
    pub pr_limit: u32,
    #[builder(default = "MARKER_LABEL.to_string()")]
    pub marker_label: String,
    #[builder(default = "true")]
    pub apply_marker_label: bool,
    #[builder(default = "DEFAULT_COMMENT.to_string()")]
    pub comment: String,
    #[builder(default = "DEFAULT_BODY.to_string()")]
    pub changelog_template: String,
}

impl RunOptionsBuilder {
    pub fn build(&self) -> Result<RunOptions> {
        self._build().map_err(|e| {
            ChangelogError::invalid_config(format!(
                "Failed to build run options: {}",
                e
            ))
        })
    }
}

impl RunOptions {
    pub fn builder() -> RunOptionsBuilder {
        RunOptionsBuilder::default()
    }
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub release: LastRelease,
    pub grouped: GroupedResult,
    pub changelog: String,
    /// Ids of the posted comments, in pull request order
    pub comment_ids: Vec<String>,
    pub completed_at: DateTime<Local>,
}

impl RunReport {
    pub fn completion_time(&self) -> String {
        self.completed_at.format(COMPLETION_TIME_FORMAT).to_string()
    }
}

pub struct Orchestrator {
    forge: ForgeManager,
    options: RunOptions,
}

impl Orchestrator {
    pub fn new(forge: ForgeManager, options: RunOptions) -> Self {
        Self { forge, options }
    }

    pub async fn lookup_labels(&self) -> Result<Vec<Label>> {
        let labels = self.forge.list_labels(self.options.label_limit).await?;

        debug!(
            "found labels: {:?}",
            labels.iter().map(|l| l.name.as_str()).collect::<Vec<&str>>()
        );

        Ok(labels)
    }

    pub async fn release_anchor(&self) -> Result<LastRelease> {
        self.forge.get_last_release().await
    }

    /// Merged pull requests since the release anchor that no earlier run
    /// marked, ascending by creation time.
    pub async fn collect_pull_requests(
        &self,
        search: &SearchOptions,
        marker: &ProcessedMarker,
    ) -> Result<Vec<PullRequest>> {
        if search.last_release_date.is_some() {
            info!(
                "retrieving all unprocessed and merged PRs since last release \"{}\"",
                search.last_release_tag.as_deref().unwrap_or_default()
            );
        } else {
            info!("no past release was found: retrieving ALL merged PRs");
        }

        let prs = self
            .forge
            .get_merged_prs(MergedPrsRequest {
                search: search.clone(),
                limit: self.options.pr_limit,
            })
            .await?;

        let total = prs.len();
        let unmarked = marker.filter_unmarked(prs);

        info!(
            "collected {} unprocessed PRs ({} already processed)",
            unmarked.len(),
            total - unmarked.len()
        );

        Ok(unmarked)
    }

    /// Mark every pull request, one at a time. The first failure aborts;
    /// pull requests marked before it stay marked.
    pub async fn annotate(
        &self,
        marker: &ProcessedMarker,
        prs: &[PullRequest],
    ) -> Result<Vec<String>> {
        let mut comment_ids = vec![];

        for pr in prs {
            let id = marker.mark(&self.forge, pr).await.map_err(|e| {
                error!("failed to mark PR #{}: {e}", pr.number);
                e
            })?;
            comment_ids.push(id);
        }

        Ok(comment_ids)
    }

    pub async fn run(&self) -> Result<RunReport> {
        info!("processing repository {}", self.forge.remote_config().path());

        let labels = self.lookup_labels().await?;

        let mut marker = ProcessedMarker::new(
            self.options.marker_label.as_str(),
            self.options.comment.as_str(),
        );

        if !self.options.apply_marker_label {
            debug!("marker label application disabled");
        } else if !marker.resolve_label(&labels) {
            warn!(
                "label \"{}\" not found in repository: processed PRs will be commented but not labeled",
                marker.label()
            );
        }

        let release = self.release_anchor().await?;
        let search = SearchOptions::from(release.clone());

        let prs = self.collect_pull_requests(&search, &marker).await?;

        let grouped = GroupedResult::from_pull_requests(&prs);

        let comment_ids = self.annotate(&marker, &prs).await?;

        info!(
            "grouped pull requests by label:\n{}",
            serde_json::to_string_pretty(&grouped)?
        );

        let changelog = changelog::render(
            &self.options.changelog_template,
            &grouped,
            search.last_release_tag.as_deref(),
        )?;

        Ok(RunReport {
            release,
            grouped,
            changelog,
            comment_ids,
            completed_at: Local::now(),
        })
    }
}
