//! Partitioning of collected pull requests by label.
use serde::{Serialize, ser::SerializeMap};
use std::collections::HashMap;

use crate::forge::request::PullRequest;

/// Bucket holding pull requests that carry no label at all.
pub const NO_LABEL_GROUP: &str = "nolabel";

/// Pull requests sharing one label, in retrieval order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelGroup {
    pub label: String,
    pub pull_requests: Vec<PullRequest>,
}

/// Label name to pull requests. The `nolabel` bucket always exists and comes
/// first, label buckets follow in the order their label was first seen. A
/// pull request with several labels is listed under each of them.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedResult {
    groups: Vec<LabelGroup>,
    index: HashMap<String, usize>,
}

impl Default for GroupedResult {
    fn default() -> Self {
        Self {
            groups: vec![LabelGroup {
                label: NO_LABEL_GROUP.into(),
                pull_requests: vec![],
            }],
            index: HashMap::from([(NO_LABEL_GROUP.to_string(), 0)]),
        }
    }
}

impl GroupedResult {
    pub fn from_pull_requests(prs: &[PullRequest]) -> Self {
        let mut grouped = Self::default();

        for pr in prs {
            grouped.insert(pr);
        }

        grouped
    }

    fn insert(&mut self, pr: &PullRequest) {
        if pr.labels.is_empty() {
            self.push(NO_LABEL_GROUP, pr);
            return;
        }

        let mut seen: Vec<&str> = vec![];

        for label in pr.labels.iter() {
            if seen.contains(&label.as_str()) {
                continue;
            }
            seen.push(label);
            self.push(label, pr);
        }
    }

    fn push(&mut self, label: &str, pr: &PullRequest) {
        let idx = match self.index.get(label) {
            Some(idx) => *idx,
            None => {
                self.groups.push(LabelGroup {
                    label: label.to_string(),
                    pull_requests: vec![],
                });
                let idx = self.groups.len() - 1;
                self.index.insert(label.to_string(), idx);
                idx
            }
        };

        self.groups[idx].pull_requests.push(pr.clone());
    }

    pub fn get(&self, label: &str) -> Option<&[PullRequest]> {
        self.index
            .get(label)
            .map(|idx| self.groups[*idx].pull_requests.as_slice())
    }

    pub fn groups(&self) -> &[LabelGroup] {
        &self.groups
    }

    pub fn labels(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.label.as_str()).collect()
    }

    /// Total number of pull request entries across all buckets.
    pub fn membership_count(&self) -> usize {
        self.groups.iter().map(|g| g.pull_requests.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.membership_count() == 0
    }
}

impl Serialize for GroupedResult {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in self.groups.iter() {
            map.serialize_entry(&group.label, &group.pull_requests)?;
        }
        map.end()
    }
}
