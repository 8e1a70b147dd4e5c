//! Traits related to remote git forges
use async_trait::async_trait;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            AddCommentRequest, AddLabelsRequest, Label, LastRelease,
            MergedPrsRequest, PullRequest,
        },
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Forge {
    fn remote_config(&self) -> RemoteConfig;
    async fn list_labels(&self, limit: u32) -> Result<Vec<Label>>;
    async fn get_last_release(&self) -> Result<LastRelease>;
    async fn get_merged_prs(
        &self,
        req: MergedPrsRequest,
    ) -> Result<Vec<PullRequest>>;
    /// Returns the id of the created comment.
    async fn add_comment(&self, req: AddCommentRequest) -> Result<String>;
    async fn add_labels(&self, req: AddLabelsRequest) -> Result<()>;
}
