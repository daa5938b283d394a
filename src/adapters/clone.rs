use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::build::RepoBuilder;
use git2::{Cred, FetchOptions, RemoteCallbacks, Repository as GitRepository, Sort};
use std::cell::Cell;
use std::fmt;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, info};

/// Basic-auth credentials for HTTPS git access
#[derive(Clone, Default, PartialEq, Eq)]
pub struct GitCredentials {
    pub username: String,
    pub access_token: String,
}

impl fmt::Debug for GitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitCredentials")
            .field("username", &self.username)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// HTTPS clone URL of a hosted repository
pub fn codecommit_clone_url(region: &str, repository: &str) -> String {
    format!(
        "https://git-codecommit.{}.amazonaws.com/v1/repos/{}",
        region, repository
    )
}

/// One commit as printed by the linear log walk
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub when: DateTime<FixedOffset>,
    pub message: String,
}

impl LogEntry {
    fn from_commit(commit: &git2::Commit<'_>) -> Result<Self> {
        let author = commit.author();
        let time = author.when();
        let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
            .context("Commit has an out-of-range timezone offset")?;
        let when = DateTime::from_timestamp(time.seconds(), 0)
            .context("Commit has an out-of-range timestamp")?
            .with_timezone(&offset);

        Ok(Self {
            id: commit.id().to_string(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            when,
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "commit {}", self.id)?;
        writeln!(f, "Author: {} <{}>", self.author_name, self.author_email)?;
        writeln!(f, "Date:   {}", self.when.format("%a %b %d %H:%M:%S %Y %z"))?;
        writeln!(f)?;
        for line in self.message.trim_end().lines() {
            if line.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, "    {}", line)?;
            }
        }
        Ok(())
    }
}

/// Bare-clone `url` into `into`, answering at most one credential prompt.
///
/// libgit2 asks again after a rejected login; the second prompt is refused so
/// bad credentials fail instead of looping.
pub fn clone_bare(url: &str, credentials: &GitCredentials, into: &Path) -> Result<GitRepository> {
    let attempts = Cell::new(0u32);
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, _username_from_url, _allowed| {
        attempts.set(attempts.get() + 1);
        if attempts.get() > 1 {
            return Err(git2::Error::from_str("authentication rejected"));
        }
        Cred::userpass_plaintext(&credentials.username, &credentials.access_token)
    });

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);

    debug!(url, path = %into.display(), "cloning repository");
    let mut builder = RepoBuilder::new();
    let repo = builder
        .bare(true)
        .fetch_options(fetch_options)
        .clone(url, into)
        .with_context(|| format!("Failed to clone {}", url))?;
    Ok(repo)
}

/// Print every commit reachable from HEAD once, newest first
pub fn print_head_log<W: Write>(repo: &GitRepository, out: &mut W) -> Result<usize> {
    let head = repo.head().context("Failed to read HEAD")?;
    let head_oid = head.target().context("HEAD does not point to a commit")?;

    let mut revwalk = repo.revwalk().context("Failed to start commit log")?;
    revwalk.push(head_oid)?;
    revwalk.set_sorting(Sort::TIME)?;

    let mut printed = 0;
    for oid in revwalk {
        let oid = oid.context("Failed to read commit log")?;
        let commit = repo
            .find_commit(oid)
            .with_context(|| format!("Failed to load commit {}", oid))?;
        writeln!(out, "{}", LogEntry::from_commit(&commit)?)?;
        printed += 1;
    }
    out.flush()?;
    Ok(printed)
}

/// Clone into a temporary directory, print the HEAD log, then drop the clone
pub fn clone_and_print<W: Write>(
    url: &str,
    credentials: &GitCredentials,
    out: &mut W,
) -> Result<usize> {
    let scratch = TempDir::new().context("Failed to create a temporary clone directory")?;
    let repo = clone_bare(url, credentials, scratch.path())?;
    let printed = print_head_log(&repo, out)?;
    info!(url, commits = printed, "local log walk finished");
    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clone_url() {
        assert_eq!(
            codecommit_clone_url("us-east-1", "kellie1"),
            "https://git-codecommit.us-east-1.amazonaws.com/v1/repos/kellie1"
        );
    }

    #[test]
    fn test_log_entry_display() {
        let entry = LogEntry {
            id: "0123abcd".to_string(),
            author_name: "Test User".to_string(),
            author_email: "test@example.com".to_string(),
            when: FixedOffset::east_opt(-8 * 3600)
                .unwrap()
                .with_ymd_and_hms(2017, 1, 11, 12, 49, 58)
                .unwrap(),
            message: "Subject\n\nBody line\n".to_string(),
        };

        assert_eq!(
            entry.to_string(),
            "commit 0123abcd\n\
             Author: Test User <test@example.com>\n\
             Date:   Wed Jan 11 12:49:58 2017 -0800\n\
             \n\
             \x20   Subject\n\
             \n\
             \x20   Body line\n"
        );
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = GitCredentials {
            username: "kellie".to_string(),
            access_token: "hunter2".to_string(),
        };
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("kellie"));
        assert!(!debug.contains("hunter2"));
    }
}
