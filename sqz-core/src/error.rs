//! Error types and result handling for pipeline operations.

use std::fmt;
use std::io;

use crate::codec::CodecError;

/// Result alias using the crate-level [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of one pipeline invocation.
///
/// Each stage of the engine surfaces its own variant so callers can tell
/// a broken environment (I/O) apart from broken data (codec).
#[derive(Debug)]
pub enum Error {
    /// The codec backend could not be initialized.
    Init {
        /// Name of the algorithm whose backend failed to start.
        algorithm: String,
        /// Failure reported by the backend.
        source: CodecError,
    },

    /// Reading from the input stream failed.
    Read(io::Error),

    /// The codec rejected the data it was fed.
    ///
    /// Corrupted or truncated input cannot heal by repetition, so this
    /// is never retried.
    Process {
        /// Name of the algorithm that was processing the stream.
        algorithm: String,
        /// Failure reported by the backend.
        source: CodecError,
    },

    /// Writing to the output stream failed.
    Write(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Init { algorithm, source } => {
                write!(f, "failed to initialize {algorithm} codec: {source}")
            }
            Error::Read(err) => write!(f, "error reading input: {err}"),
            Error::Process { algorithm, source } => {
                write!(f, "{algorithm}: {source}")
            }
            Error::Write(err) => write!(f, "error writing output: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Init { source, .. } | Error::Process { source, .. } => Some(source),
            Error::Read(err) | Error::Write(err) => Some(err),
        }
    }
}
