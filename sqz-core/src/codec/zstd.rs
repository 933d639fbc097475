//! Zstandard codec backend over the zstd raw streaming API.
//!
//! `zstd::stream::raw` is the only layer of the zstd crate that exposes
//! fixed-buffer window semantics; the higher-level encoders all want to
//! own a `Read` or `Write` end.

use zstd::stream::raw::{Decoder as RawDecoder, Encoder as RawEncoder, InBuffer, Operation, OutBuffer};

use crate::config::CompressionLevel;

use super::{Codec, CodecError, CodecFactory, Mode, Step, StreamStatus};

/// Factory for the `zstd` algorithm.
#[derive(Debug, Default)]
pub struct ZstdFactory;

impl CodecFactory for ZstdFactory {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn create(
        &self,
        mode: Mode,
        level: CompressionLevel,
    ) -> Result<Box<dyn Codec>, CodecError> {
        match mode {
            Mode::Encode => {
                let raw = RawEncoder::new(zstd_level(level))
                    .map_err(|err| CodecError::new(format!("zstd encoder: {err}")))?;
                Ok(Box::new(ZstdEncoder {
                    raw,
                    finished: false,
                }))
            }
            Mode::Decode => {
                let raw = RawDecoder::new()
                    .map_err(|err| CodecError::new(format!("zstd decoder: {err}")))?;
                Ok(Box::new(ZstdDecoder {
                    raw,
                    finished: false,
                }))
            }
        }
    }
}

fn zstd_level(level: CompressionLevel) -> i32 {
    match level {
        CompressionLevel::Fast => 1,
        CompressionLevel::Default => 3,
        CompressionLevel::Best => 19,
    }
}

struct ZstdEncoder {
    raw: RawEncoder<'static>,
    finished: bool,
}

impl Codec for ZstdEncoder {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Step, CodecError> {
        if self.finished {
            return Ok(Step {
                consumed: 0,
                produced: 0,
                status: StreamStatus::Finished,
            });
        }

        let mut input = InBuffer::around(src);
        let mut output = OutBuffer::around(dst);

        if !src.is_empty() {
            self.raw
                .run(&mut input, &mut output)
                .map_err(|err| CodecError::new(format!("zstd compression failed: {err}")))?;
        }

        if finalize && input.pos == src.len() {
            let remaining = self
                .raw
                .finish(&mut output, true)
                .map_err(|err| CodecError::new(format!("zstd compression failed: {err}")))?;
            if remaining == 0 {
                self.finished = true;
            }
        }

        Ok(Step {
            consumed: input.pos,
            produced: output.pos(),
            status: if self.finished {
                StreamStatus::Finished
            } else {
                StreamStatus::Active
            },
        })
    }
}

struct ZstdDecoder {
    raw: RawDecoder<'static>,
    finished: bool,
}

impl Codec for ZstdDecoder {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Step, CodecError> {
        if self.finished {
            return Ok(Step {
                consumed: 0,
                produced: 0,
                status: StreamStatus::Finished,
            });
        }

        let mut input = InBuffer::around(src);
        let mut output = OutBuffer::around(dst);

        // A zero hint from the decoder marks the end of the frame.
        let hint = self
            .raw
            .run(&mut input, &mut output)
            .map_err(|err| CodecError::new(format!("corrupt zstd stream: {err}")))?;
        if hint == 0 {
            self.finished = true;
        }

        if finalize && !self.finished && input.pos == src.len() && output.pos() == 0 {
            return Err(CodecError::new("truncated zstd stream"));
        }

        Ok(Step {
            consumed: input.pos,
            produced: output.pos(),
            status: if self.finished {
                StreamStatus::Finished
            } else {
                StreamStatus::Active
            },
        })
    }
}
