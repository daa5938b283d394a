use crate::domain::{Branch, Commit, Repository};
use crate::error::Result;

/// Port receiving history events in visit order
pub trait HistoryReporter {
    fn repository(&mut self, repository: &Repository) -> Result<()>;

    /// Default branch of the current repository; `None` for an empty repository
    fn default_branch(&mut self, branch_name: Option<&str>) -> Result<()>;

    fn branch(&mut self, branch_name: &str) -> Result<()>;

    /// Tip of the branch about to be walked
    fn branch_tip(&mut self, branch: &Branch) -> Result<()>;

    fn commit(&mut self, commit: &Commit) -> Result<()>;
}
