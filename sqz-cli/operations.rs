//! Bridges between CLI streams and the core pipeline.

use std::io::{Read, Write};

use sqz_core::{pipeline, CodecFactory, PipelineOptions, StreamSummary};

use crate::error::{Error, Result};

/// Compresses `input` into `output` with the given codec.
///
/// # Errors
///
/// Returns an error if the codec fails or either stream breaks.
pub fn compress_stream(
    input: impl Read,
    output: impl Write,
    factory: &dyn CodecFactory,
    options: &PipelineOptions,
) -> Result<StreamSummary> {
    pipeline::encode(input, output, factory, options).map_err(map_core_error)
}

/// Decompresses `input` into `output` with the given codec.
///
/// # Errors
///
/// Returns an error if the data is corrupted, the codec fails, or
/// either stream breaks.
pub fn decompress_stream(
    input: impl Read,
    output: impl Write,
    factory: &dyn CodecFactory,
    options: &PipelineOptions,
) -> Result<StreamSummary> {
    pipeline::decode(input, output, factory, options).map_err(map_core_error)
}

fn map_core_error(err: sqz_core::Error) -> Error {
    match err {
        sqz_core::Error::Init { algorithm, source }
        | sqz_core::Error::Process { algorithm, source } => Error::Codec {
            algorithm,
            message: source.to_string(),
        },
        sqz_core::Error::Read(err) => Error::ReadStream(err),
        sqz_core::Error::Write(err) => Error::WriteStream(err),
    }
}

/// Prints the post-operation summary line to stderr.
pub fn report_summary(summary: &StreamSummary, compressing: bool) {
    if compressing {
        eprintln!(
            "Compressed {} bytes to {} bytes ({:.1}% of original)",
            summary.bytes_read,
            summary.bytes_written,
            summary.compression_ratio() * 100.0
        );
    } else {
        eprintln!(
            "Decompressed {} bytes to {} bytes",
            summary.bytes_read, summary.bytes_written
        );
    }
}
