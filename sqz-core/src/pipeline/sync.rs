//! Synchronous two-buffer pump between a reader and a writer.

use std::io::{Read, Write};

use log::debug;

use crate::codec::{CodecError, CodecFactory, Mode, StreamStatus};
use crate::config::{PipelineOptions, StreamSummary};
use crate::error::{Error, Result};

/// Iterations without any progress after which the pump gives up.
///
/// On truncated input a codec can keep reporting an active stream while
/// consuming and producing nothing once the reader is exhausted.
const MAX_SPINS: usize = 64;

/// Compresses data from a reader into a writer using the given codec.
///
/// The pump allocates two `options.chunk_size()` buffers and drives the
/// codec session until the stream terminates, so memory use is bounded
/// regardless of input size.
///
/// # Errors
///
/// Returns an error if:
///
/// - The codec backend cannot be initialized
/// - I/O operations on reader or writer fail
/// - The codec rejects the data or stops making progress
pub fn encode<R, W>(
    reader: R,
    writer: W,
    factory: &dyn CodecFactory,
    options: &PipelineOptions,
) -> Result<StreamSummary>
where
    R: Read,
    W: Write,
{
    run(reader, writer, factory, options, Mode::Encode)
}

/// Decompresses data from a reader into a writer using the given codec.
///
/// # Errors
///
/// Returns an error if:
///
/// - The codec backend cannot be initialized
/// - I/O operations on reader or writer fail
/// - The compressed data is corrupted, truncated, or was produced by a
///   different algorithm
pub fn decode<R, W>(
    reader: R,
    writer: W,
    factory: &dyn CodecFactory,
    options: &PipelineOptions,
) -> Result<StreamSummary>
where
    R: Read,
    W: Write,
{
    run(reader, writer, factory, options, Mode::Decode)
}

fn run<R, W>(
    mut reader: R,
    mut writer: W,
    factory: &dyn CodecFactory,
    options: &PipelineOptions,
    mode: Mode,
) -> Result<StreamSummary>
where
    R: Read,
    W: Write,
{
    debug!(
        "starting {mode:?} session: algorithm={} chunk_size={}",
        factory.name(),
        options.chunk_size()
    );

    let mut codec = factory.create(mode, options.level()).map_err(|source| Error::Init {
        algorithm: factory.name().to_owned(),
        source,
    })?;

    let mut src = vec![0u8; options.chunk_size()];
    let mut dst = vec![0u8; options.chunk_size()];
    let mut start = 0usize;
    let mut end = 0usize;
    let mut eof = false;
    let mut total_in = 0u64;
    let mut total_out = 0u64;
    let mut spins = 0usize;

    loop {
        // Refill the source window only once it is fully consumed; the
        // codec may need several calls to drain a single window.
        if start == end && !eof {
            let read = reader.read(&mut src).map_err(Error::Read)?;
            if read == 0 {
                eof = true;
            } else {
                start = 0;
                end = read;
            }
        }

        let step = codec
            .process(&src[start..end], &mut dst, eof)
            .map_err(|source| Error::Process {
                algorithm: factory.name().to_owned(),
                source,
            })?;

        start += step.consumed;
        total_in += step.consumed as u64;

        if step.produced > 0 {
            writer.write_all(&dst[..step.produced]).map_err(Error::Write)?;
            total_out += step.produced as u64;
        }

        if step.status == StreamStatus::Finished {
            break;
        }

        if step.consumed == 0 && step.produced == 0 {
            spins += 1;
            if spins >= MAX_SPINS {
                return Err(Error::Process {
                    algorithm: factory.name().to_owned(),
                    source: CodecError::new("stream stalled; input may be truncated"),
                });
            }
        } else {
            spins = 0;
        }
    }

    writer.flush().map_err(Error::Write)?;
    debug!(
        "{} session finished: {total_in} bytes in, {total_out} bytes out",
        factory.name()
    );
    Ok(StreamSummary::new(total_in, total_out))
}
