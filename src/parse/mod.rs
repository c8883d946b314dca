//! Conventional commit parsing.
//!
//! The downstream half of the pipeline: NDJSON commit records in, parsed
//! NDJSON records out. Also backs the standalone `parse-commit` command.

pub mod stage;

pub use stage::run_stage;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Settings;
use crate::git::CommitRecord;

#[allow(clippy::expect_used)]
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)(?:\((?P<scope>[^)]+)\))?(?P<breaking>!)?: (?P<description>.+)$")
        .expect("invalid header regex")
});

/// Errors surfaced by the parse stage.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Reading the pipe or writing the sink failed.
    #[error("parse stage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// An input line was not a valid commit record.
    #[error("invalid commit record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
}

/// Parsed conventional commit header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionalHeader {
    /// Commit type (feat, fix, chore, ...).
    pub r#type: String,
    /// Scope, when given in parentheses.
    pub scope: Option<String>,
    /// Whether the header carries the `!` breaking-change marker.
    pub breaking: bool,
    /// Description following the colon.
    pub description: String,
}

/// One output line of the parse stage: the source record plus its parsed
/// header, `null` when the subject failed to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// The commit record as read from the input stream.
    #[serde(flatten)]
    pub commit: CommitRecord,
    /// Parsed header, absent for unparsed commits.
    pub parsed: Option<ConventionalHeader>,
}

/// Parses commit subjects as conventional commit headers.
#[derive(Debug, Clone, Default)]
pub struct CommitParser {
    types: Option<Vec<String>>,
}

impl CommitParser {
    /// Creates a parser honoring the configured commit type allow-list.
    pub fn new(settings: &Settings) -> Self {
        Self {
            types: settings.types.clone(),
        }
    }

    /// Parses a subject line, `None` when it is not a conventional commit.
    pub fn parse(&self, subject: &str) -> Option<ConventionalHeader> {
        let captures = HEADER_RE.captures(subject)?;
        let kind = captures.name("type")?.as_str();

        if let Some(allowed) = &self.types {
            if !allowed.iter().any(|t| t == kind) {
                return None;
            }
        }

        Some(ConventionalHeader {
            r#type: kind.to_string(),
            scope: captures.name("scope").map(|m| m.as_str().to_string()),
            breaking: captures.name("breaking").is_some(),
            description: captures.name("description")?.as_str().to_string(),
        })
    }
}
