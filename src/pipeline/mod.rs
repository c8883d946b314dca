//! The two-stage commit pipeline.
//!
//! The main loop serializes commit records and writes NDJSON lines. With
//! parsing enabled the lines go into an in-process pipe whose read end is
//! consumed by a concurrently spawned parse stage, which owns the real sink
//! and shuts it down when its input ends. The pipe is the only shared
//! resource: one writer, one reader, bounded capacity for backpressure.

pub mod sink;

pub use sink::{OutputTarget, Sink};

use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::git::CommitRecord;
use crate::parse::{self, CommitParser, ParseError};

/// Pipe capacity between the enumeration loop and the parse stage.
const PIPE_CAPACITY: usize = 64 * 1024;

/// How a pipeline run routes its output.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Route commits through the conventional-commit parse stage.
    pub parse: bool,
    /// Tri-state include-unparsed flag; `None` means it was not given.
    pub include_unparsed: Option<bool>,
}

/// Runs the pipeline: serialize each commit from `commits` and forward it to
/// `sink`, optionally through the parse stage.
///
/// Commits are forwarded in enumeration order, one write at a time. On an
/// enumeration or serialization error the parse task is cancelled, the write
/// path is closed, and the original error is returned; a non-cancellation
/// error from the parse task is only logged in that case. The sink is shut
/// down exactly once by whichever stage owns it.
pub async fn run<S>(
    mut commits: S,
    sink: Sink,
    settings: &Settings,
    options: &PipelineOptions,
) -> Result<()>
where
    S: Stream<Item = Result<CommitRecord>> + Unpin,
{
    // Only an affirmative --include-unparsed is meaningless without --parse;
    // an explicit --no-include-unparsed already matches the default behavior.
    if options.include_unparsed == Some(true) && !options.parse {
        warn!("--include-unparsed is ignored without --parse");
    }

    let mut parse_task: Option<JoinHandle<Result<(), ParseError>>> = None;

    let mut out: Sink = if options.parse {
        let (pipe_reader, pipe_writer) = tokio::io::simplex(PIPE_CAPACITY);
        let parser = CommitParser::new(settings);
        let include_unparsed = options.include_unparsed.unwrap_or(false);

        debug!("Scheduling parse-commit stage");
        parse_task = Some(tokio::spawn(parse::run_stage(
            BufReader::new(pipe_reader),
            sink,
            parser,
            include_unparsed,
        )));

        Box::new(pipe_writer)
    } else {
        sink
    };

    let result = forward_commits(&mut commits, &mut out).await;

    if result.is_err() {
        if let Some(task) = &parse_task {
            task.abort();
        }
    }

    // Close the write path so the parse stage observes end-of-stream. On the
    // error path the primary error wins over any shutdown failure.
    let closed = out.shutdown().await;
    drop(out);

    // Await settlement of the parse task. A cancellation-kind result is
    // expected after abort and counts as success; anything else becomes a
    // secondary error that must not mask the primary one.
    let mut secondary: Option<anyhow::Error> = None;
    if let Some(task) = parse_task {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => secondary = Some(anyhow::Error::new(err)),
            Err(join_err) if join_err.is_cancelled() => {}
            Err(join_err) => {
                secondary = Some(anyhow::Error::new(join_err).context("parse stage panicked"));
            }
        }
    }

    match (result, secondary) {
        (Err(primary), Some(sec)) => {
            warn!("parse stage error suppressed by earlier failure: {sec:#}");
            Err(primary)
        }
        (Err(primary), None) => Err(primary),
        (Ok(()), Some(sec)) => Err(sec),
        (Ok(()), None) => closed.context("Failed to flush output"),
    }
}

/// Serializes and writes each commit, in stream order, one line per commit.
async fn forward_commits<S>(commits: &mut S, out: &mut Sink) -> Result<()>
where
    S: Stream<Item = Result<CommitRecord>> + Unpin,
{
    while let Some(next) = commits.next().await {
        let commit = next?;

        let mut line = serde_json::to_vec(&commit)
            .with_context(|| format!("Failed to serialize commit {}", commit.hash))?;
        line.push(b'\n');

        out.write_all(&line)
            .await
            .context("Failed to write commit")?;
    }

    Ok(())
}
