//! Common test utilities for orchestrator tests.

use chrono::{DateTime, Utc};

use crate::{
    forge::{
        config::{MARKER_LABEL, RemoteConfig},
        manager::ForgeManager,
        request::{Author, Label, LastRelease, PullRequest},
        traits::MockForge,
    },
    orchestrator::{Orchestrator, RunOptions},
};

/// Creates a test Orchestrator with default options around the mock forge.
///
/// # Example
/// ```ignore
/// let mut mock_forge = MockForge::new();
/// mock_forge.expect_list_labels().returning(|_| Ok(vec![]));
/// let orchestrator = create_test_orchestrator(mock_forge);
/// ```
pub fn create_test_orchestrator(mock_forge: MockForge) -> Orchestrator {
    create_test_orchestrator_with(
        mock_forge,
        RemoteConfig::default(),
        RunOptions::builder().build().unwrap(),
    )
}

/// Creates a test Orchestrator with a custom remote config and options.
pub fn create_test_orchestrator_with(
    mut mock_forge: MockForge,
    remote: RemoteConfig,
    options: RunOptions,
) -> Orchestrator {
    let remote = RemoteConfig {
        owner: "acme".into(),
        repo: "widgets".into(),
        ..remote
    };
    mock_forge
        .expect_remote_config()
        .returning(move || remote.clone());

    Orchestrator::new(ForgeManager::new(Box::new(mock_forge)), options)
}

pub fn pr(number: u64, labels: &[&str]) -> PullRequest {
    PullRequest {
        id: format!("PR_{number}"),
        number,
        title: format!("change {number}"),
        url: format!("https://github.com/acme/widgets/pull/{number}"),
        created_at: None,
        labels: labels.iter().map(|l| l.to_string()).collect(),
        author: Some(Author {
            login: "octocat".into(),
        }),
    }
}

pub fn repo_labels() -> Vec<Label> {
    vec![
        Label {
            id: "LA_bug".into(),
            name: "bug".into(),
        },
        Label {
            id: "LA_feature".into(),
            name: "feature".into(),
        },
        Label {
            id: "LA_marker".into(),
            name: MARKER_LABEL.into(),
        },
    ]
}

pub fn release_at(published_at: &str, tag: &str) -> LastRelease {
    LastRelease {
        published_at: Some(published_at.parse::<DateTime<Utc>>().unwrap()),
        tag_name: Some(tag.into()),
    }
}

pub fn numbers(prs: Option<&[PullRequest]>) -> Vec<u64> {
    prs.unwrap().iter().map(|p| p.number).collect()
}
