//! # sqz-core
//!
//! Bounded-memory streaming compression and decompression pipeline.
//!
//! This crate provides the pieces the `sqz` command-line tool is built
//! from: a codec capability trait with pluggable backends (zlib, lz4,
//! zstd), a registry mapping algorithm names to codec factories, a
//! chunked two-buffer stream engine that drives a codec across inputs of
//! any size, and progress-instrumented stream wrappers.

pub mod codec;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod registry;

pub use codec::{Codec, CodecError, CodecFactory, Mode, Step, StreamStatus};
pub use config::{CompressionLevel, PipelineOptions, StreamSummary, DEFAULT_CHUNK_SIZE};
pub use error::{Error, Result};
pub use registry::CodecRegistry;
