//! Output sink selection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio::io::AsyncWrite;

/// Boxed write half handed to the pipeline. Whichever stage ends up owning
/// it shuts it down exactly once.
pub type Sink = Box<dyn AsyncWrite + Send + Unpin>;

/// Where serialized commits are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputTarget {
    /// The process's standard output.
    #[default]
    Stdout,
    /// A file, truncated on open.
    File(PathBuf),
}

impl OutputTarget {
    /// Maps a CLI `--output` value; `-` or absence means stdout.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Self::Stdout,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    /// Opens the sink for writing.
    pub async fn open(&self) -> Result<Sink> {
        match self {
            Self::Stdout => Ok(Box::new(tokio::io::stdout())),
            Self::File(path) => {
                let file = File::create(path)
                    .await
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;

                Ok(Box::new(file))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_and_absence_mean_stdout() {
        assert_eq!(OutputTarget::from_arg(None), OutputTarget::Stdout);
        assert_eq!(OutputTarget::from_arg(Some("-")), OutputTarget::Stdout);
    }

    #[test]
    fn path_means_file() {
        assert_eq!(
            OutputTarget::from_arg(Some("out.ndjson")),
            OutputTarget::File(PathBuf::from("out.ndjson"))
        );
    }
}
