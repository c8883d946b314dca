//! # convey
//!
//! Streams a range of git commits as line-delimited JSON, optionally piping
//! each record through a conventional-commit parsing stage.
//!
//! The interesting piece is a small two-stage pipeline: an async commit
//! stream feeding an output sink, with an optional concurrent parse task
//! connected by an in-process pipe. See [`pipeline`] for the wiring and
//! [`parse`] for the downstream stage.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod git;
pub mod parse;
pub mod pipeline;

pub use crate::cli::Cli;

/// The current version of convey.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
