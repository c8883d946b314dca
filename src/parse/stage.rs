//! The parse stage task.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use super::{CommitParser, ParseError, ParsedRecord};
use crate::git::CommitRecord;

/// Reads NDJSON commit records from `input`, parses each subject and writes
/// the results to `output` as NDJSON.
///
/// Commits whose subject fails to parse are dropped unless
/// `include_unparsed` is set, in which case they are emitted with a null
/// `parsed` field. The output is shut down when the input reaches
/// end-of-stream.
pub async fn run_stage<R, W>(
    input: R,
    mut output: W,
    parser: CommitParser,
    include_unparsed: bool,
) -> Result<(), ParseError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let commit: CommitRecord = serde_json::from_str(&line)?;
        let parsed = parser.parse(&commit.subject);

        if parsed.is_none() && !include_unparsed {
            debug!("Dropping unparsed commit {}", commit.hash);
            continue;
        }

        let record = ParsedRecord { commit, parsed };
        let mut buf = serde_json::to_vec(&record)?;
        buf.push(b'\n');
        output.write_all(&buf).await?;
    }

    output.shutdown().await?;

    Ok(())
}
