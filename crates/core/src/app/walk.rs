use std::collections::HashSet;

use tracing::{debug, trace};

use crate::domain::CommitId;
use crate::error::Result;
use crate::ports::{CodeCommitApi, HistoryReporter};

/// Options for a single history walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Report each commit at most once per walk instead of once per path
    pub dedup_ancestors: bool,
}

/// Counters for one finished walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Commits fetched and reported
    pub reported: usize,
    /// Commits not fetched again because this walk had already reported them
    pub skipped: usize,
}

impl std::ops::AddAssign for WalkStats {
    fn add_assign(&mut self, other: Self) {
        self.reported += other.reported;
        self.skipped += other.skipped;
    }
}

/// Depth-first, pre-order walk over the parent links of a commit.
///
/// The walk keeps its own stack so history length never turns into call
/// depth. Parents are pushed in reverse so they are visited in the order the
/// service lists them, each parent's whole history before the next parent.
/// Without dedup the output matches a naive recursion: a commit reachable
/// through several paths is reported once per path.
pub struct HistoryWalker<A> {
    pub(crate) api: A,
    options: WalkOptions,
}

impl<A: CodeCommitApi> HistoryWalker<A> {
    pub fn new(api: A, options: WalkOptions) -> Self {
        Self { api, options }
    }

    pub fn walk(
        &self,
        repository_name: &str,
        start: &CommitId,
        reporter: &mut dyn HistoryReporter,
    ) -> Result<WalkStats> {
        let mut stats = WalkStats::default();
        let mut visited: HashSet<CommitId> = HashSet::new();
        let mut stack = vec![start.clone()];

        debug!(repository = repository_name, start = %start, "walking commit history");

        while let Some(commit_id) = stack.pop() {
            if self.options.dedup_ancestors && !visited.insert(commit_id.clone()) {
                trace!(commit = %commit_id, "already reported in this walk");
                stats.skipped += 1;
                continue;
            }

            let commit = self.api.get_commit(repository_name, &commit_id)?;
            reporter.commit(&commit)?;
            stats.reported += 1;

            if !commit.is_root() {
                stack.extend(commit.parents.iter().rev().cloned());
            }
        }

        debug!(
            repository = repository_name,
            reported = stats.reported,
            skipped = stats.skipped,
            "commit history walk finished"
        );
        Ok(stats)
    }
}
