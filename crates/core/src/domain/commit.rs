use serde::{Deserialize, Serialize};

/// Full object id of a commit
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(pub String);

impl From<&str> for CommitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CommitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author or committer of a commit.
///
/// `date` is kept exactly as the service sends it (`"<unix seconds> <tz>"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date: date.into(),
        }
    }
}

/// Commit metadata fetched for a single commit id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub commit_id: CommitId,
    #[serde(default)]
    pub tree_id: Option<String>,
    /// Parents in the order the service returned them; empty for a root commit
    #[serde(default)]
    pub parents: Vec<CommitId>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Identity,
    #[serde(default)]
    pub committer: Identity,
    #[serde(default)]
    pub additional_data: Option<String>,
}

impl Commit {
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
