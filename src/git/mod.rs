//! Git operations: repository access and the async commit stream.

pub mod commit;
pub mod repository;
pub mod stream;

pub use commit::{CommitRecord, Identity};
pub use repository::GitRepository;
pub use stream::{stream_commits, CommitStream, RevRange, DEFAULT_TO_REV};
