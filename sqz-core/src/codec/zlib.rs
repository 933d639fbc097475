//! Zlib codec backend over flate2's buffer-level stream API.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::config::CompressionLevel;

use super::{Codec, CodecError, CodecFactory, Mode, Step, StreamStatus};

/// Factory for the `zlib` algorithm.
#[derive(Debug, Default)]
pub struct ZlibFactory;

impl CodecFactory for ZlibFactory {
    fn name(&self) -> &'static str {
        "zlib"
    }

    fn create(
        &self,
        mode: Mode,
        level: CompressionLevel,
    ) -> Result<Box<dyn Codec>, CodecError> {
        match mode {
            Mode::Encode => Ok(Box::new(ZlibEncoder {
                inner: Compress::new(flate2_level(level), true),
            })),
            Mode::Decode => Ok(Box::new(ZlibDecoder {
                inner: Decompress::new(true),
            })),
        }
    }
}

fn flate2_level(level: CompressionLevel) -> Compression {
    match level {
        CompressionLevel::Fast => Compression::fast(),
        CompressionLevel::Default => Compression::default(),
        CompressionLevel::Best => Compression::best(),
    }
}

struct ZlibEncoder {
    inner: Compress,
}

impl Codec for ZlibEncoder {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Step, CodecError> {
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();

        let flush = if finalize {
            FlushCompress::Finish
        } else {
            FlushCompress::None
        };

        let status = self
            .inner
            .compress(src, dst, flush)
            .map_err(|err| CodecError::new(format!("deflate error: {err}")))?;

        Ok(step(
            self.inner.total_in() - before_in,
            self.inner.total_out() - before_out,
            status,
        ))
    }
}

struct ZlibDecoder {
    inner: Decompress,
}

impl Codec for ZlibDecoder {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Step, CodecError> {
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();

        let flush = if finalize {
            FlushDecompress::Finish
        } else {
            FlushDecompress::None
        };

        let status = self
            .inner
            .decompress(src, dst, flush)
            .map_err(|err| CodecError::new(format!("corrupt zlib stream: {err}")))?;

        Ok(step(
            self.inner.total_in() - before_in,
            self.inner.total_out() - before_out,
            status,
        ))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn step(consumed: u64, produced: u64, status: Status) -> Step {
    Step {
        // Per-call deltas are bounded by the chunk buffer sizes.
        consumed: consumed as usize,
        produced: produced as usize,
        status: match status {
            Status::StreamEnd => StreamStatus::Finished,
            Status::Ok | Status::BufError => StreamStatus::Active,
        },
    }
}
