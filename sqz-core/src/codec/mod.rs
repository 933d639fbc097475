//! Codec capability: the stateful transform the stream engine drives.
//!
//! A codec session follows an init → feed → finalize → destroy
//! lifecycle. [`CodecFactory::create`] is init, repeated
//! [`Codec::process`] calls feed fixed-size buffer windows through the
//! transform (with `finalize` raised once the input is exhausted), and
//! dropping the boxed codec is destroy. Backends hold whatever native or
//! buffered state they need between calls; a codec value is never shared
//! across invocations or threads.

use std::fmt;
use std::io;

use crate::config::CompressionLevel;

mod lz4;
mod zlib;
mod zstd;

pub use lz4::Lz4Factory;
pub use zlib::ZlibFactory;
pub use zstd::ZstdFactory;

/// Transform direction of a codec session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compress plain bytes into the codec's stream format.
    Encode,
    /// Expand the codec's stream format back into plain bytes.
    Decode,
}

/// Whether the logical stream is still in flight or fully terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// The codec may produce more output; keep pumping.
    Active,
    /// The stream is complete; no further calls are needed.
    Finished,
}

/// Outcome of one [`Codec::process`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Bytes consumed from the source window.
    pub consumed: usize,
    /// Bytes produced into the destination window.
    pub produced: usize,
    /// Stream state after this call.
    pub status: StreamStatus,
}

/// Failure reported by a codec backend.
///
/// Covers both initialization failures and corrupted or incompatible
/// data detected mid-stream.
#[derive(Debug)]
pub struct CodecError {
    message: String,
}

impl CodecError {
    /// Creates an error from a human-readable reason.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CodecError {}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        CodecError::new(err.to_string())
    }
}

/// One encode or decode session over fixed-size buffer windows.
pub trait Codec {
    /// Feeds a source window through the transform into a destination
    /// window.
    ///
    /// `finalize` signals that no more input will ever arrive; the codec
    /// must flush internally buffered state and terminate the stream. A
    /// single call need not drain everything available: the caller loops
    /// until [`StreamStatus::Finished`], re-presenting unconsumed input
    /// and an empty destination each time.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when the data is corrupted, truncated,
    /// or produced by an incompatible algorithm. Such failures are
    /// fatal for the session.
    fn process(&mut self, src: &[u8], dst: &mut [u8], finalize: bool)
        -> Result<Step, CodecError>;
}

/// Factory producing codec sessions for one named algorithm.
pub trait CodecFactory: Send + Sync {
    /// Canonical lowercase algorithm name, also used as the file
    /// extension for compressed output.
    fn name(&self) -> &'static str;

    /// Starts a new codec session.
    ///
    /// `level` applies to [`Mode::Encode`] and is ignored by decoders
    /// and by backends without tunable effort.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when the backend cannot be initialized.
    fn create(&self, mode: Mode, level: CompressionLevel)
        -> Result<Box<dyn Codec>, CodecError>;
}
