use tracing::{debug, info};

use crate::app::walk::{HistoryWalker, WalkOptions, WalkStats};
use crate::domain::Repository;
use crate::error::Result;
use crate::ports::{CodeCommitApi, HistoryReporter, ListRepositoriesRequest};

/// Which branches of each repository get walked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BranchMode {
    /// Only the branch the repository names as its default
    DefaultOnly,
    /// Every branch of the repository
    #[default]
    All,
}

/// Counters for a whole enumeration run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub repositories: usize,
    pub branches: usize,
    pub commits: WalkStats,
}

/// Drives repositories -> branches -> history walks.
///
/// Every service error ends the run immediately; nothing past the failing
/// call is reported.
pub struct Enumerator<A> {
    walker: HistoryWalker<A>,
    mode: BranchMode,
}

impl<A: CodeCommitApi> Enumerator<A> {
    pub fn new(api: A, mode: BranchMode, options: WalkOptions) -> Self {
        Self {
            walker: HistoryWalker::new(api, options),
            mode,
        }
    }

    fn api(&self) -> &A {
        &self.walker.api
    }

    pub fn run(&self, reporter: &mut dyn HistoryReporter) -> Result<RunStats> {
        let mut stats = RunStats::default();
        let request = ListRepositoriesRequest::by_last_modified();
        let mut next_token: Option<String> = None;

        loop {
            let page = self.api().list_repositories(&request.with_token(next_token.take()))?;
            debug!(count = page.items.len(), more = page.next_token.is_some(), "repository page");

            for repository in &page.items {
                reporter.repository(repository)?;
                stats.repositories += 1;
                self.enumerate_repository(repository, reporter, &mut stats)?;
            }

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        info!(
            repositories = stats.repositories,
            branches = stats.branches,
            commits = stats.commits.reported,
            "enumeration finished"
        );
        Ok(stats)
    }

    fn enumerate_repository(
        &self,
        repository: &Repository,
        reporter: &mut dyn HistoryReporter,
        stats: &mut RunStats,
    ) -> Result<()> {
        let name = repository.repository_name.as_str();
        match self.mode {
            BranchMode::DefaultOnly => {
                let metadata = self.api().get_repository(name)?;
                reporter.default_branch(metadata.default_branch.as_deref())?;
                match metadata.default_branch {
                    Some(branch_name) => self.walk_branch(name, &branch_name, reporter, stats)?,
                    None => debug!(repository = name, "no default branch, skipping"),
                }
            }
            BranchMode::All => {
                let mut next_token: Option<String> = None;
                loop {
                    let page = self.api().list_branches(name, next_token.as_deref())?;
                    for branch_name in &page.items {
                        reporter.branch(branch_name)?;
                        self.walk_branch(name, branch_name, reporter, stats)?;
                    }
                    match page.next_token {
                        Some(token) => next_token = Some(token),
                        None => break,
                    }
                }
            }
        }
        Ok(())
    }

    fn walk_branch(
        &self,
        repository_name: &str,
        branch_name: &str,
        reporter: &mut dyn HistoryReporter,
        stats: &mut RunStats,
    ) -> Result<()> {
        let branch = self.api().get_branch(repository_name, branch_name)?;
        reporter.branch_tip(&branch)?;
        stats.branches += 1;
        stats.commits += self.walker.walk(repository_name, &branch.commit_id, reporter)?;
        Ok(())
    }
}
