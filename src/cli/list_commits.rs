//! List-commits command: streams a revision range as NDJSON.

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::Settings;
use crate::git::{stream_commits, GitRepository, RevRange, DEFAULT_TO_REV};
use crate::pipeline::{self, OutputTarget, PipelineOptions};

/// List-commits command options.
#[derive(Parser, Debug)]
pub struct ListCommitsCommand {
    /// File to write commits to; `-` writes to stdout.
    #[arg(long, default_value = "-")]
    pub output: String,

    /// Revision to start from (exclusive); the range starts at the root
    /// commit when unset.
    #[arg(long = "from", value_name = "REV")]
    pub from_rev: Option<String>,

    /// Revision to end at (inclusive).
    #[arg(long = "to", value_name = "REV", default_value = DEFAULT_TO_REV)]
    pub to_rev: String,

    /// Parse commits with the conventional-commit stage before emitting.
    #[arg(long)]
    pub parse: bool,

    /// Also emit commits which fail to be parsed. See `parse-commit`.
    #[arg(long, overrides_with = "no_include_unparsed")]
    include_unparsed: bool,

    /// Never emit commits which fail to be parsed.
    #[arg(long, overrides_with = "include_unparsed")]
    no_include_unparsed: bool,
}

impl ListCommitsCommand {
    /// Tri-state view of the include-unparsed flag pair; `None` when
    /// neither flag was given.
    pub fn include_unparsed(&self) -> Option<bool> {
        if self.include_unparsed {
            Some(true)
        } else if self.no_include_unparsed {
            Some(false)
        } else {
            None
        }
    }

    /// Executes the list-commits command.
    pub async fn execute(self) -> Result<()> {
        let repo = GitRepository::open()
            .context("Failed to open git repository. Make sure you're in a git repository.")?;
        let settings = Settings::load()?;

        let range = RevRange::new(self.from_rev.clone(), self.to_rev.clone());
        let commits = stream_commits(repo.path(), range);

        let sink = OutputTarget::from_arg(Some(&self.output)).open().await?;
        let options = PipelineOptions {
            parse: self.parse,
            include_unparsed: self.include_unparsed(),
        };

        pipeline::run(commits, sink, &settings, &options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> ListCommitsCommand {
        ListCommitsCommand::try_parse_from(
            std::iter::once("list-commits").chain(args.iter().copied()),
        )
        .unwrap()
    }

    #[test]
    fn include_unparsed_defaults_to_unset() {
        let cmd = parse_args(&[]);
        assert_eq!(cmd.include_unparsed(), None);
    }

    #[test]
    fn include_unparsed_flag_pair_is_tri_state() {
        assert_eq!(parse_args(&["--include-unparsed"]).include_unparsed(), Some(true));
        assert_eq!(
            parse_args(&["--no-include-unparsed"]).include_unparsed(),
            Some(false)
        );
        // Last flag wins.
        assert_eq!(
            parse_args(&["--include-unparsed", "--no-include-unparsed"]).include_unparsed(),
            Some(false)
        );
    }

    #[test]
    fn to_revision_defaults_to_head() {
        let cmd = parse_args(&[]);
        assert_eq!(cmd.to_rev, "HEAD");
        assert_eq!(cmd.from_rev, None);
        assert_eq!(cmd.output, "-");
    }
}
