use serde::{Deserialize, Serialize};

use crate::domain::CommitId;

/// A branch and the commit it currently points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub branch_name: String,
    pub commit_id: CommitId,
}

impl Branch {
    pub fn new(name: impl Into<String>, tip: impl Into<CommitId>) -> Self {
        Self {
            branch_name: name.into(),
            commit_id: tip.into(),
        }
    }
}
