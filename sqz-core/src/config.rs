//! Shared configuration primitives for stream processing.

use std::num::NonZeroUsize;

/// Default size of the source and destination chunk buffers, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Compression effort selector, interpreted by each codec backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Favour speed over compression ratio.
    Fast,
    /// Use the backend's default balance between speed and ratio.
    Default,
    /// Favour the best possible compression ratio.
    Best,
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Default
    }
}

/// Options controlling one pipeline invocation.
///
/// Both the source and destination buffer are sized by `chunk_size`, so
/// peak buffer allocation is independent of the input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    chunk_size: NonZeroUsize,
    level: CompressionLevel,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        // DEFAULT_CHUNK_SIZE is a non-zero constant.
        let chunk_size = NonZeroUsize::new(DEFAULT_CHUNK_SIZE)
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            chunk_size,
            level: CompressionLevel::default(),
        }
    }
}

impl PipelineOptions {
    /// Sets the chunk buffer size used for both the source and
    /// destination buffers.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the compression level passed to the codec backend.
    ///
    /// Ignored by decode pipelines and by backends without tunable
    /// effort.
    #[must_use]
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Chunk buffer size in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    /// Compression level for encode pipelines.
    pub fn level(&self) -> CompressionLevel {
        self.level
    }
}

/// Statistical summary of a completed stream processing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    /// Total number of bytes consumed from the input source.
    pub bytes_read: u64,

    /// Total number of bytes written to the output destination.
    pub bytes_written: u64,
}

impl StreamSummary {
    pub(crate) const fn new(bytes_read: u64, bytes_written: u64) -> Self {
        Self {
            bytes_read,
            bytes_written,
        }
    }

    /// Ratio of output to input size.
    ///
    /// Below 1.0 means the data shrank, above 1.0 means it grew.
    #[allow(clippy::cast_precision_loss)]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_read == 0 {
            if self.bytes_written == 0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            self.bytes_written as f64 / self.bytes_read as f64
        }
    }

    /// Space saved as a percentage of the input size.
    ///
    /// Negative when the output is larger than the input.
    pub fn space_saved_percent(&self) -> f64 {
        if self.bytes_read == 0 {
            0.0
        } else {
            (1.0 - self.compression_ratio()) * 100.0
        }
    }
}
