//! In-memory stand-ins for the ports, shared by unit and integration tests

use std::cell::RefCell;
use std::collections::HashMap;

use crate::domain::{Branch, Commit, CommitId, Identity, Repository, RepositoryMetadata};
use crate::error::{CoreError, Result};
use crate::ports::{CodeCommitApi, HistoryReporter, ListRepositoriesRequest, Page};

/// Service fake holding repositories, branches and commits in maps.
///
/// Unknown branches and commits fail the way the real service does, with a
/// `*DoesNotExistException` service error.
#[derive(Debug, Default)]
pub struct InMemoryCodeCommit {
    page_size: Option<usize>,
    repositories: Vec<Repository>,
    default_branches: HashMap<String, String>,
    branch_names: HashMap<String, Vec<String>>,
    tips: HashMap<(String, String), CommitId>,
    commits: HashMap<(String, CommitId), Commit>,
    calls: RefCell<Vec<String>>,
    last_list_request: RefCell<Option<ListRepositoriesRequest>>,
}

impl InMemoryCodeCommit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split every listing into pages of `size` items
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size.max(1));
        self
    }

    pub fn with_repository(mut self, id: &str, name: &str) -> Self {
        self.repositories.push(Repository::new(id, name));
        self
    }

    pub fn with_default_branch(mut self, repository: &str, branch: &str) -> Self {
        self.default_branches
            .insert(repository.to_string(), branch.to_string());
        self
    }

    pub fn with_branch(mut self, repository: &str, branch: &str, tip: &str) -> Self {
        self = self.with_branch_name_only(repository, branch);
        self.tips.insert(
            (repository.to_string(), branch.to_string()),
            CommitId::from(tip),
        );
        self
    }

    /// List a branch name that `get_branch` cannot resolve
    pub fn with_branch_name_only(mut self, repository: &str, branch: &str) -> Self {
        self.branch_names
            .entry(repository.to_string())
            .or_default()
            .push(branch.to_string());
        self
    }

    pub fn with_commit(mut self, repository: &str, id: &str, parents: &[&str]) -> Self {
        let commit = Commit {
            commit_id: CommitId::from(id),
            tree_id: None,
            parents: parents.iter().map(|p| CommitId::from(*p)).collect(),
            message: format!("message for {}", id),
            author: Identity::new("Test User", "test@example.com", "1484167798 -0800"),
            committer: Identity::new("Test User", "test@example.com", "1484167798 -0800"),
            additional_data: None,
        };
        self.commits
            .insert((repository.to_string(), commit.commit_id.clone()), commit);
        self
    }

    /// Every call made so far, as `Operation repository ...`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Commit ids passed to `get_commit`, in call order
    pub fn commit_fetches(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.strip_prefix("GetCommit "))
            .filter_map(|rest| rest.split_whitespace().nth(1))
            .map(str::to_string)
            .collect()
    }

    pub fn last_list_request(&self) -> Option<ListRepositoriesRequest> {
        self.last_list_request.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn page<T: Clone>(&self, items: &[T], token: Option<&str>) -> Page<T> {
        let start = token.and_then(|t| t.parse::<usize>().ok()).unwrap_or(0);
        let end = match self.page_size {
            Some(size) => (start + size).min(items.len()),
            None => items.len(),
        };
        let next_token = (end < items.len()).then(|| end.to_string());
        Page {
            items: items[start.min(end)..end].to_vec(),
            next_token,
        }
    }

    fn not_found(operation: &'static str, code: &str, message: String) -> CoreError {
        CoreError::Service {
            operation,
            status: Some(400),
            code: code.to_string(),
            message,
        }
    }
}

impl CodeCommitApi for InMemoryCodeCommit {
    fn list_repositories(&self, request: &ListRepositoriesRequest) -> Result<Page<Repository>> {
        self.record(format!(
            "ListRepositories {}",
            request.next_token.as_deref().unwrap_or("-")
        ));
        *self.last_list_request.borrow_mut() = Some(request.clone());
        Ok(self.page(&self.repositories, request.next_token.as_deref()))
    }

    fn get_repository(&self, repository_name: &str) -> Result<RepositoryMetadata> {
        self.record(format!("GetRepository {}", repository_name));
        let repository = self
            .repositories
            .iter()
            .find(|r| r.repository_name == repository_name)
            .ok_or_else(|| {
                Self::not_found(
                    "GetRepository",
                    "RepositoryDoesNotExistException",
                    format!("{} does not exist", repository_name),
                )
            })?;
        Ok(RepositoryMetadata {
            repository_id: repository.repository_id.clone(),
            repository_name: repository.repository_name.clone(),
            default_branch: self.default_branches.get(repository_name).cloned(),
        })
    }

    fn list_branches(
        &self,
        repository_name: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>> {
        self.record(format!(
            "ListBranches {} {}",
            repository_name,
            next_token.unwrap_or("-")
        ));
        let names = self
            .branch_names
            .get(repository_name)
            .cloned()
            .unwrap_or_default();
        Ok(self.page(&names, next_token))
    }

    fn get_branch(&self, repository_name: &str, branch_name: &str) -> Result<Branch> {
        self.record(format!("GetBranch {} {}", repository_name, branch_name));
        self.tips
            .get(&(repository_name.to_string(), branch_name.to_string()))
            .map(|tip| Branch::new(branch_name, tip.clone()))
            .ok_or_else(|| {
                Self::not_found(
                    "GetBranch",
                    "BranchDoesNotExistException",
                    format!("{} does not exist", branch_name),
                )
            })
    }

    fn get_commit(&self, repository_name: &str, commit_id: &CommitId) -> Result<Commit> {
        self.record(format!("GetCommit {} {}", repository_name, commit_id));
        self.commits
            .get(&(repository_name.to_string(), commit_id.clone()))
            .cloned()
            .ok_or_else(|| {
                Self::not_found(
                    "GetCommit",
                    "CommitDoesNotExistException",
                    format!("{} does not exist", commit_id),
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    Repository(String),
    DefaultBranch(Option<String>),
    Branch(String),
    BranchTip(String, String),
    Commit(String),
}

/// Reporter that keeps every event for later assertions
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<RecordedEvent>,
}

impl RecordingReporter {
    pub fn commit_ids(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Commit(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }
}

impl HistoryReporter for RecordingReporter {
    fn repository(&mut self, repository: &Repository) -> Result<()> {
        self.events
            .push(RecordedEvent::Repository(repository.repository_name.clone()));
        Ok(())
    }

    fn default_branch(&mut self, branch_name: Option<&str>) -> Result<()> {
        self.events
            .push(RecordedEvent::DefaultBranch(branch_name.map(str::to_string)));
        Ok(())
    }

    fn branch(&mut self, branch_name: &str) -> Result<()> {
        self.events.push(RecordedEvent::Branch(branch_name.to_string()));
        Ok(())
    }

    fn branch_tip(&mut self, branch: &Branch) -> Result<()> {
        self.events.push(RecordedEvent::BranchTip(
            branch.branch_name.clone(),
            branch.commit_id.to_string(),
        ));
        Ok(())
    }

    fn commit(&mut self, commit: &Commit) -> Result<()> {
        self.events
            .push(RecordedEvent::Commit(commit.commit_id.to_string()));
        Ok(())
    }
}
