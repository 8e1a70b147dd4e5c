//! Filter-then-mark protocol keeping runs from processing a pull request
//! twice.
//!
//! A run first drops every pull request that already carries the marker
//! label, then marks each remaining one: it posts the processed comment and,
//! when the marker label exists in the repository, applies that label. The
//! label is what the next run filters on.
use log::*;

use crate::{
    Result,
    forge::{
        manager::ForgeManager,
        request::{AddCommentRequest, AddLabelsRequest, Label, PullRequest},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedMarker {
    label: String,
    label_id: Option<String>,
    comment: String,
}

impl ProcessedMarker {
    pub fn new(label: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            label_id: None,
            comment: comment.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Whether marking will also apply the label.
    pub fn applies_label(&self) -> bool {
        self.label_id.is_some()
    }

    /// Remember the node id of the marker label if the repository defines it.
    pub fn resolve_label(&mut self, labels: &[Label]) -> bool {
        self.label_id = labels
            .iter()
            .find(|l| l.name == self.label)
            .map(|l| l.id.clone());
        self.label_id.is_some()
    }

    pub fn is_marked(&self, pr: &PullRequest) -> bool {
        pr.has_label(&self.label)
    }

    /// Drop pull requests that an earlier run already marked.
    pub fn filter_unmarked(&self, prs: Vec<PullRequest>) -> Vec<PullRequest> {
        prs.into_iter()
            .filter(|pr| {
                let marked = self.is_marked(pr);
                if marked {
                    debug!("skipping already processed PR #{}", pr.number);
                }
                !marked
            })
            .collect()
    }

    /// Comment on the pull request and apply the marker label. Returns the
    /// created comment id.
    pub async fn mark(
        &self,
        forge: &ForgeManager,
        pr: &PullRequest,
    ) -> Result<String> {
        let comment_id = forge
            .add_comment(AddCommentRequest {
                subject_id: pr.id.clone(),
                body: self.comment.clone(),
            })
            .await?;

        info!("commented on PR #{}: {comment_id}", pr.number);

        if let Some(label_id) = self.label_id.as_ref() {
            forge
                .add_labels(AddLabelsRequest {
                    labelable_id: pr.id.clone(),
                    label_ids: vec![label_id.clone()],
                })
                .await?;

            debug!("applied label {} to PR #{}", self.label, pr.number);
        }

        Ok(comment_id)
    }
}
