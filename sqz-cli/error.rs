//! Error types for CLI operations.

use std::io;
use std::path::PathBuf;

/// Result alias using the CLI [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to the user by the `sqz` tool.
///
/// Usage errors (bad arguments, unresolvable requests) and environment
/// errors (missing files, failing I/O) get their own variants so the
/// message can point at the actual culprit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("input file '{0}' does not exist")]
    InputNotFound(PathBuf),

    #[error("input file '{0}' is not readable")]
    InputNotReadable(PathBuf),

    #[error("unknown algorithm '{name}' (supported: {supported})")]
    UnknownAlgorithm { name: String, supported: String },

    #[error("cannot infer algorithm from '{0}'; use --algorithm")]
    AlgorithmNotInferable(PathBuf),

    #[error("reading from standard input requires --algorithm")]
    AlgorithmRequiredForStdin,

    #[error("output file '{0}' already exists; use --force to overwrite")]
    OutputExists(PathBuf),

    #[error("input and output refer to the same file '{0}'")]
    SameFile(PathBuf),

    #[error("output directory '{0}' is not writable")]
    OutputDirUnwritable(PathBuf),

    #[error("failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to open input file '{path}': {source}")]
    OpenInput {
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to create output file '{path}': {source}")]
    CreateOutput {
        path: PathBuf,
        source: io::Error,
    },

    #[error("error reading input: {0}")]
    ReadStream(io::Error),

    #[error("error writing output: {0}")]
    WriteStream(io::Error),

    #[error("{algorithm}: {message}")]
    Codec { algorithm: String, message: String },
}
