//! Manager that wraps forge implementations
use log::*;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            AddCommentRequest, AddLabelsRequest, Label, LastRelease,
            MergedPrsRequest, PullRequest,
        },
        traits::Forge,
    },
};

/// Comment id reported for comments skipped in dry-run mode.
pub const DRY_RUN_COMMENT_ID: &str = "dry-run";

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn remote_config(&self) -> RemoteConfig {
        self.remote_config.clone()
    }

    pub async fn list_labels(&self, limit: u32) -> Result<Vec<Label>> {
        debug!(
            "listing up to {limit} labels for {}",
            self.remote_config.path()
        );
        self.forge.list_labels(limit).await
    }

    pub async fn get_last_release(&self) -> Result<LastRelease> {
        self.forge.get_last_release().await
    }

    pub async fn get_merged_prs(
        &self,
        req: MergedPrsRequest,
    ) -> Result<Vec<PullRequest>> {
        debug!("getting merged pull requests: {:?}", req);
        self.forge.get_merged_prs(req).await
    }

    pub async fn add_comment(&self, req: AddCommentRequest) -> Result<String> {
        if self.remote_config.dry_run {
            warn!("dry_run: would add comment: req: {:#?}", req);
            return Ok(DRY_RUN_COMMENT_ID.into());
        }
        self.forge.add_comment(req).await
    }

    pub async fn add_labels(&self, req: AddLabelsRequest) -> Result<()> {
        if self.remote_config.dry_run {
            warn!("dry_run: would add labels: req: {:#?}", req);
            return Ok(());
        }
        self.forge.add_labels(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::traits::MockForge;

    fn dry_run_config() -> RemoteConfig {
        RemoteConfig {
            dry_run: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_labels_delegates_to_forge() {
        let mut mock_forge = MockForge::new();
        mock_forge
            .expect_remote_config()
            .returning(RemoteConfig::default);
        mock_forge
            .expect_list_labels()
            .with(mockall::predicate::eq(100))
            .returning(|_| {
                Ok(vec![Label {
                    id: "LA_1".into(),
                    name: "bug".into(),
                }])
            });

        let manager = ForgeManager::new(Box::new(mock_forge));
        let labels = manager.list_labels(100).await.unwrap();

        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name, "bug");
    }

    #[tokio::test]
    async fn add_comment_returns_forge_comment_id() {
        let mut mock_forge = MockForge::new();
        mock_forge
            .expect_remote_config()
            .returning(RemoteConfig::default);
        mock_forge
            .expect_add_comment()
            .times(1)
            .returning(|_| Ok("IC_42".into()));

        let manager = ForgeManager::new(Box::new(mock_forge));
        let id = manager
            .add_comment(AddCommentRequest {
                subject_id: "PR_1".into(),
                body: "processed".into(),
            })
            .await
            .unwrap();

        assert_eq!(id, "IC_42");
    }

    #[tokio::test]
    async fn dry_run_prevents_add_comment() {
        let mut mock_forge = MockForge::new();
        mock_forge.expect_remote_config().returning(dry_run_config);
        mock_forge.expect_add_comment().never();

        let manager = ForgeManager::new(Box::new(mock_forge));
        let id = manager
            .add_comment(AddCommentRequest {
                subject_id: "PR_1".into(),
                body: "processed".into(),
            })
            .await
            .unwrap();

        assert_eq!(id, DRY_RUN_COMMENT_ID);
    }

    #[tokio::test]
    async fn dry_run_prevents_add_labels() {
        let mut mock_forge = MockForge::new();
        mock_forge.expect_remote_config().returning(dry_run_config);
        mock_forge.expect_add_labels().never();

        let manager = ForgeManager::new(Box::new(mock_forge));
        let result = manager
            .add_labels(AddLabelsRequest {
                labelable_id: "PR_1".into(),
                label_ids: vec!["LA_marker".into()],
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn dry_run_still_reads() {
        let mut mock_forge = MockForge::new();
        mock_forge.expect_remote_config().returning(dry_run_config);
        mock_forge
            .expect_get_last_release()
            .times(1)
            .returning(|| Ok(LastRelease::default()));

        let manager = ForgeManager::new(Box::new(mock_forge));
        let release = manager.get_last_release().await.unwrap();

        assert!(release.tag_name.is_none());
    }
}
