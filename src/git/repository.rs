//! Git repository access.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::Repository;

/// Git repository wrapper.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Opens the repository containing the current directory.
    pub fn open() -> Result<Self> {
        let repo = Repository::discover(".").context("Not in a git repository")?;

        Ok(Self { repo })
    }

    /// Opens the repository at the given path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Returns the path of the repository's git directory.
    pub fn path(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    /// Checks that a revision resolves to a commit.
    pub fn resolve_revision(&self, rev: &str) -> Result<String> {
        let obj = self
            .repo
            .revparse_single(rev)
            .with_context(|| format!("Failed to resolve revision: {rev}"))?;
        let commit = obj
            .peel_to_commit()
            .with_context(|| format!("Revision does not point at a commit: {rev}"))?;

        Ok(commit.id().to_string())
    }
}
