use serde::{Deserialize, Serialize};

/// Repository as returned by a repository listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub repository_id: String,
    pub repository_name: String,
}

impl Repository {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repository_id: id.into(),
            repository_name: name.into(),
        }
    }
}

/// Full repository metadata; only the fields this tool reads are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadata {
    pub repository_id: String,
    pub repository_name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}
