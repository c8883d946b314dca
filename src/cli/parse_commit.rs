//! Parse-commit command: reads NDJSON commit records, emits parsed ones.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncRead, BufReader};

use crate::config::Settings;
use crate::parse::{self, CommitParser};
use crate::pipeline::OutputTarget;

/// Parse-commit command options.
#[derive(Parser, Debug)]
pub struct ParseCommitCommand {
    /// File to read commit records from; `-` reads from stdin.
    #[arg(long, default_value = "-")]
    pub input: String,

    /// File to write results to; `-` writes to stdout.
    #[arg(long, default_value = "-")]
    pub output: String,

    /// Also emit commits which fail to be parsed, with a null `parsed` field.
    #[arg(long)]
    pub include_unparsed: bool,
}

impl ParseCommitCommand {
    /// Executes the parse-commit command.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load()?;
        let parser = CommitParser::new(&settings);

        let input: Box<dyn AsyncRead + Send + Unpin> = match self.input.as_str() {
            "-" => Box::new(tokio::io::stdin()),
            path => Box::new(
                tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open input file: {path}"))?,
            ),
        };
        let output = OutputTarget::from_arg(Some(&self.output)).open().await?;

        parse::run_stage(BufReader::new(input), output, parser, self.include_unparsed)
            .await
            .context("parse-commit failed")
    }
}
