use crate::domain::{Branch, Commit, CommitId, Repository, RepositoryMetadata};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Field a repository listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    RepositoryName,
    LastModifiedDate,
}

/// Direction of a repository listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Order {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRepositoriesRequest {
    pub sort_by: SortBy,
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ListRepositoriesRequest {
    /// Oldest-modified repositories first
    pub fn by_last_modified() -> Self {
        Self {
            sort_by: SortBy::LastModifiedDate,
            order: Order::Ascending,
            next_token: None,
        }
    }

    pub fn with_token(&self, next_token: Option<String>) -> Self {
        Self {
            next_token,
            ..self.clone()
        }
    }
}

/// One page of a listing plus the token for the next page, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

/// Port for the repository-hosting service.
///
/// Every call is a single blocking request; implementations must not retry.
pub trait CodeCommitApi {
    /// List one page of repositories
    fn list_repositories(&self, request: &ListRepositoriesRequest) -> Result<Page<Repository>>;

    /// Get repository metadata, including its default branch
    fn get_repository(&self, repository_name: &str) -> Result<RepositoryMetadata>;

    /// List one page of branch names
    fn list_branches(&self, repository_name: &str, next_token: Option<&str>)
        -> Result<Page<String>>;

    /// Get a branch and its tip commit
    fn get_branch(&self, repository_name: &str, branch_name: &str) -> Result<Branch>;

    /// Get a single commit's metadata and parent ids
    fn get_commit(&self, repository_name: &str, commit_id: &CommitId) -> Result<Commit>;
}

impl<T: CodeCommitApi + ?Sized> CodeCommitApi for &T {
    fn list_repositories(&self, request: &ListRepositoriesRequest) -> Result<Page<Repository>> {
        (**self).list_repositories(request)
    }

    fn get_repository(&self, repository_name: &str) -> Result<RepositoryMetadata> {
        (**self).get_repository(repository_name)
    }

    fn list_branches(
        &self,
        repository_name: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>> {
        (**self).list_branches(repository_name, next_token)
    }

    fn get_branch(&self, repository_name: &str, branch_name: &str) -> Result<Branch> {
        (**self).get_branch(repository_name, branch_name)
    }

    fn get_commit(&self, repository_name: &str, commit_id: &CommitId) -> Result<Commit> {
        (**self).get_commit(repository_name, commit_id)
    }
}
