//! Async commit enumeration.
//!
//! `git2` is blocking, so the revision walk runs on a blocking task that
//! feeds a bounded channel. The receiving end is exposed as a
//! [`futures::Stream`] of commit records, which gives the pipeline its
//! suspension point between commits and backpressure toward the walker.

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use anyhow::{Context, Result};
use futures::Stream;
use git2::Repository;
use tokio::sync::mpsc;
use tracing::debug;

use crate::git::CommitRecord;

/// Default end of the revision range.
pub const DEFAULT_TO_REV: &str = "HEAD";

/// Commits buffered between the walker and the pipeline.
const CHANNEL_CAPACITY: usize = 32;

/// A `(from, to)` pair bounding which commits are enumerated.
///
/// `from` is exclusive and optional; the walk starts at the root commit when
/// it is unset. `to` is inclusive.
#[derive(Debug, Clone)]
pub struct RevRange {
    /// Revision to start from, exclusive.
    pub from: Option<String>,
    /// Revision to end at, inclusive.
    pub to: String,
}

impl RevRange {
    /// Creates a range from optional start and explicit end revisions.
    pub fn new(from: Option<String>, to: impl Into<String>) -> Self {
        Self { from, to: to.into() }
    }

    /// Creates a range ending at `HEAD`.
    pub fn to_head(from: Option<String>) -> Self {
        Self::new(from, DEFAULT_TO_REV)
    }
}

/// Ordered stream of commit records in `git log` order (newest first).
pub struct CommitStream {
    rx: mpsc::Receiver<Result<CommitRecord>>,
    walker: Option<tokio::task::JoinHandle<()>>,
}

impl Stream for CommitStream {
    type Item = Result<CommitRecord>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        use std::future::Future;

        let this = self.get_mut();

        match this.rx.poll_recv(cx) {
            // A closed channel without a joined walker could also mean the
            // walker died mid-walk; join it before declaring end-of-stream.
            Poll::Ready(None) => match this.walker.as_mut() {
                Some(handle) => match Pin::new(handle).poll(cx) {
                    Poll::Ready(Ok(())) => {
                        this.walker = None;
                        Poll::Ready(None)
                    }
                    Poll::Ready(Err(join_err)) => {
                        this.walker = None;
                        Poll::Ready(Some(Err(
                            anyhow::Error::new(join_err).context("Commit walker panicked")
                        )))
                    }
                    Poll::Pending => Poll::Pending,
                },
                None => Poll::Ready(None),
            },
            other => other,
        }
    }
}

/// Starts enumerating the commits of `range` in the repository at `repo_path`.
///
/// Enumeration is lazy: the walk only advances as the stream is consumed.
/// An underlying git error arrives as the final `Err` item.
pub fn stream_commits(repo_path: PathBuf, range: RevRange) -> CommitStream {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    let walker = tokio::task::spawn_blocking(move || {
        if let Err(err) = walk_commits(&repo_path, &range, &tx) {
            // The receiver may already be gone; then there is no one to tell.
            if tx.blocking_send(Err(err)).is_err() {
                debug!("commit stream dropped before error could be delivered");
            }
        }
    });

    CommitStream {
        rx,
        walker: Some(walker),
    }
}

fn walk_commits(
    repo_path: &Path,
    range: &RevRange,
    tx: &mpsc::Sender<Result<CommitRecord>>,
) -> Result<()> {
    let repo = Repository::open(repo_path).context("Failed to open git repository")?;

    let mut walker = repo.revwalk().context("Failed to create revwalk")?;
    walker
        .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
        .context("Failed to set revwalk sorting")?;

    let to_obj = repo
        .revparse_single(&range.to)
        .with_context(|| format!("Failed to resolve revision: {}", range.to))?;
    let to_commit = to_obj
        .peel_to_commit()
        .with_context(|| format!("Revision does not point at a commit: {}", range.to))?;
    walker
        .push(to_commit.id())
        .context("Failed to push end revision")?;

    if let Some(from) = &range.from {
        let from_obj = repo
            .revparse_single(from)
            .with_context(|| format!("Failed to resolve revision: {from}"))?;
        let from_commit = from_obj
            .peel_to_commit()
            .with_context(|| format!("Revision does not point at a commit: {from}"))?;
        walker
            .hide(from_commit.id())
            .context("Failed to hide start revision")?;
    }

    for oid in walker {
        let oid = oid.context("Failed to get commit OID from walker")?;
        let commit = repo.find_commit(oid).context("Failed to find commit")?;
        let record = CommitRecord::from_git_commit(&commit)?;

        // A closed receiver means the consumer gave up; stop walking.
        if tx.blocking_send(Ok(record)).is_err() {
            break;
        }
    }

    Ok(())
}
