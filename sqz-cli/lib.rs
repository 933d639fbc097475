//! Shared functionality for the `sqz` command-line tool.
//!
//! This crate holds everything between argument parsing and the core
//! pipeline: request validation, algorithm and output resolution, stream
//! acquisition, progress reporting, and cleanup of partial output when
//! an operation fails.

pub mod config;
pub mod error;
pub mod io;
pub mod operations;
pub mod process;
pub mod reporter;

pub use config::{CliConfig, OperationMode, Preset};
pub use error::{Error, Result};
pub use io::{InputSource, LocalFiles, OutputTarget};
pub use process::run;

#[cfg(test)]
mod tests;
