//! CLI interface for convey.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod list_commits;
pub mod parse_commit;

/// convey: stream git commits as NDJSON
#[derive(Parser)]
#[command(name = "convey")]
#[command(about = "Stream git commits as NDJSON, optionally parsed as conventional commits", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// List commits in a revision range as NDJSON
    #[command(name = "list-commits")]
    ListCommits(list_commits::ListCommitsCommand),
    /// Parse NDJSON commit records as conventional commits
    #[command(name = "parse-commit")]
    ParseCommit(parse_commit::ParseCommitCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::ListCommits(cmd) => cmd.execute().await,
            Commands::ParseCommit(cmd) => cmd.execute().await,
        }
    }
}
