//! LZ4 codec backend framing raw lz4_flex blocks.
//!
//! lz4_flex only exposes its frame format through `Read`/`Write`
//! adapters, which cannot be driven by a fixed-window pump, so this
//! backend frames raw blocks itself: each block is
//! `[compressed_len: u32 le][raw_len: u32 le][compressed bytes]`, and a
//! block with both lengths zero terminates the stream. Raw blocks are at
//! most [`BLOCK_SIZE`] bytes, which bounds the codec's internal
//! buffering independently of the input size.

use lz4_flex::block;

use crate::config::CompressionLevel;

use super::{Codec, CodecError, CodecFactory, Mode, Step, StreamStatus};

/// Maximum uncompressed payload of one block.
const BLOCK_SIZE: usize = 64 * 1024;

/// Size of the per-block length header.
const HEADER_SIZE: usize = 8;

/// Factory for the `lz4` algorithm.
#[derive(Debug, Default)]
pub struct Lz4Factory;

impl CodecFactory for Lz4Factory {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn create(
        &self,
        mode: Mode,
        _level: CompressionLevel,
    ) -> Result<Box<dyn Codec>, CodecError> {
        // LZ4 block compression has no tunable effort.
        match mode {
            Mode::Encode => Ok(Box::new(Lz4Encoder::default())),
            Mode::Decode => Ok(Box::new(Lz4Decoder::default())),
        }
    }
}

/// Produced bytes waiting to be copied out through destination windows.
#[derive(Default)]
struct OutQueue {
    buf: Vec<u8>,
    pos: usize,
}

impl OutQueue {
    fn push(&mut self, bytes: &[u8]) {
        if self.pos == self.buf.len() {
            self.buf.clear();
            self.pos = 0;
        }
        self.buf.extend_from_slice(bytes);
    }

    fn push_header(&mut self, compressed_len: u32, raw_len: u32) {
        let mut header = [0u8; HEADER_SIZE];
        header[..4].copy_from_slice(&compressed_len.to_le_bytes());
        header[4..].copy_from_slice(&raw_len.to_le_bytes());
        self.push(&header);
    }

    fn drain(&mut self, dst: &mut [u8]) -> usize {
        let available = self.buf.len() - self.pos;
        let take = available.min(dst.len());
        dst[..take].copy_from_slice(&self.buf[self.pos..self.pos + take]);
        self.pos += take;
        take
    }

    fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }
}

#[derive(Default)]
struct Lz4Encoder {
    staged: Vec<u8>,
    queue: OutQueue,
    wrote_trailer: bool,
}

impl Codec for Lz4Encoder {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Step, CodecError> {
        let consumed = src.len().min(BLOCK_SIZE - self.staged.len());
        self.staged.extend_from_slice(&src[..consumed]);

        let input_exhausted = finalize && consumed == src.len();

        if self.staged.len() == BLOCK_SIZE || (input_exhausted && !self.staged.is_empty()) {
            let compressed = block::compress(&self.staged);
            self.queue
                .push_header(compressed.len() as u32, self.staged.len() as u32);
            self.queue.push(&compressed);
            self.staged.clear();
        }

        if input_exhausted && self.staged.is_empty() && !self.wrote_trailer {
            self.queue.push_header(0, 0);
            self.wrote_trailer = true;
        }

        let produced = self.queue.drain(dst);
        Ok(Step {
            consumed,
            produced,
            status: if self.wrote_trailer && self.queue.is_empty() {
                StreamStatus::Finished
            } else {
                StreamStatus::Active
            },
        })
    }
}

#[derive(Default)]
struct Lz4Decoder {
    pending: Vec<u8>,
    queue: OutQueue,
    finished: bool,
}

impl Codec for Lz4Decoder {
    fn process(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        finalize: bool,
    ) -> Result<Step, CodecError> {
        let mut consumed = 0;

        // Input is accepted only while no decoded block is waiting to be
        // drained, so buffering never grows past one block plus one
        // source window regardless of the stream length.
        if !self.finished && self.queue.is_empty() && !self.decode_next()? {
            self.pending.extend_from_slice(src);
            consumed = src.len();

            // Nothing more will arrive and the buffered bytes do not
            // form a complete block.
            if !self.decode_next()? && finalize {
                return Err(CodecError::new("truncated lz4 stream"));
            }
        }

        let produced = self.queue.drain(dst);
        Ok(Step {
            consumed,
            produced,
            status: if self.finished && self.queue.is_empty() {
                StreamStatus::Finished
            } else {
                StreamStatus::Active
            },
        })
    }
}

impl Lz4Decoder {
    /// Decodes the next block if a complete one is buffered.
    ///
    /// Returns `false` when more input is needed first.
    fn decode_next(&mut self) -> Result<bool, CodecError> {
        if self.finished || self.pending.len() < HEADER_SIZE {
            return Ok(false);
        }

        let compressed_len = read_u32(&self.pending[..4]) as usize;
        let raw_len = read_u32(&self.pending[4..8]) as usize;

        if compressed_len == 0 && raw_len == 0 {
            self.finished = true;
            self.pending.clear();
            return Ok(true);
        }

        if raw_len > BLOCK_SIZE || compressed_len > block::get_maximum_output_size(BLOCK_SIZE) {
            return Err(CodecError::new("corrupt lz4 stream: block header out of range"));
        }

        if self.pending.len() < HEADER_SIZE + compressed_len {
            return Ok(false);
        }

        let raw = block::decompress(
            &self.pending[HEADER_SIZE..HEADER_SIZE + compressed_len],
            raw_len,
        )
        .map_err(|err| CodecError::new(format!("corrupt lz4 stream: {err}")))?;
        if raw.len() != raw_len {
            return Err(CodecError::new("corrupt lz4 stream: block length mismatch"));
        }

        self.queue.push(&raw);
        self.pending.drain(..HEADER_SIZE + compressed_len);
        Ok(true)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut le = [0u8; 4];
    le.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(le)
}
