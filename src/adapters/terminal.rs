use std::io::Write;

use cchistory_core::domain::{Branch, Commit, Repository};
use cchistory_core::error::Result;
use cchistory_core::ports::HistoryReporter;
use colored::Colorize;

/// Prints history events as an indented, human-readable trace
pub struct TerminalReporter<W: Write> {
    out: W,
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> HistoryReporter for TerminalReporter<W> {
    fn repository(&mut self, repository: &Repository) -> Result<()> {
        writeln!(
            self.out,
            "repository ID: {}, repository Name: {}",
            repository.repository_id, repository.repository_name
        )?;
        Ok(())
    }

    fn default_branch(&mut self, branch_name: Option<&str>) -> Result<()> {
        writeln!(
            self.out,
            "   -- default branch: {}",
            branch_name.unwrap_or("<none>")
        )?;
        Ok(())
    }

    fn branch(&mut self, branch_name: &str) -> Result<()> {
        writeln!(self.out, "   --branch: {}", branch_name)?;
        Ok(())
    }

    fn branch_tip(&mut self, branch: &Branch) -> Result<()> {
        writeln!(self.out, "       --LastCommitID: {}", branch.commit_id)?;
        writeln!(self.out, "       --Commit History:")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn commit(&mut self, commit: &Commit) -> Result<()> {
        let heading = format!("Commit: {}", commit.commit_id).red();
        match commit.additional_data.as_deref().filter(|d| !d.is_empty()) {
            Some(data) => writeln!(self.out, "         {} {}", heading, data)?,
            None => writeln!(self.out, "         {}", heading)?,
        }
        writeln!(
            self.out,
            "           Author: {}, Date: {}",
            commit.author.name, commit.author.date
        )?;
        writeln!(self.out)?;
        writeln!(self.out, "                 {}", commit.message.trim_end())?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cchistory_core::domain::{CommitId, Identity};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut TerminalReporter<Vec<u8>>) -> Result<()>,
    {
        colored::control::set_override(false);
        let mut reporter = TerminalReporter::new(Vec::new());
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_repository_and_branch_lines() {
        let out = render(|r| {
            r.repository(&Repository::new("id-1", "kellie1"))?;
            r.branch("main")?;
            r.branch_tip(&Branch::new("main", "c3"))
        });
        assert_eq!(
            out,
            "repository ID: id-1, repository Name: kellie1\n\
             \x20  --branch: main\n\
             \x20      --LastCommitID: c3\n\
             \x20      --Commit History:\n\n"
        );
    }

    #[test]
    fn test_missing_default_branch() {
        let out = render(|r| r.default_branch(None));
        assert_eq!(out, "   -- default branch: <none>\n");
    }

    #[test]
    fn test_commit_block() {
        let commit = Commit {
            commit_id: CommitId::from("c3"),
            tree_id: None,
            parents: vec![CommitId::from("c1")],
            message: "Add readme\n".to_string(),
            author: Identity::new("Kellie", "k@example.com", "1484167798 -0800"),
            committer: Identity::default(),
            additional_data: Some(String::new()),
        };
        let out = render(|r| r.commit(&commit));
        assert_eq!(
            out,
            "         Commit: c3\n\
             \x20          Author: Kellie, Date: 1484167798 -0800\n\
             \n\
             \x20                Add readme\n\
             \n"
        );
    }
}
