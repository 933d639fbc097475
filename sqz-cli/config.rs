//! Configuration for CLI operations.

use sqz_core::CompressionLevel;

use crate::io::{InputSource, OutputTarget};

/// Represents the two modes of operation for the CLI utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Compress input data
    Compress,
    /// Decompress input data
    Decompress,
}

/// Named compression profile trading speed against output size.
///
/// A preset bundles a recommended algorithm, an effort level, and a
/// chunk size; an explicit `--algorithm` flag overrides only the
/// algorithm choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Prioritize throughput over output size.
    Speed,
    /// Reasonable middle ground.
    #[default]
    Balanced,
    /// Prioritize output size over throughput.
    Ratio,
}

impl Preset {
    /// Effort level passed to the codec backend.
    #[must_use]
    pub fn level(self) -> CompressionLevel {
        match self {
            Preset::Speed => CompressionLevel::Fast,
            Preset::Balanced => CompressionLevel::Default,
            Preset::Ratio => CompressionLevel::Best,
        }
    }

    /// Pipeline buffer size; the speed preset trades memory for fewer
    /// pump iterations.
    #[must_use]
    pub fn chunk_size(self) -> usize {
        match self {
            Preset::Speed => 256 * 1024,
            Preset::Balanced | Preset::Ratio => 64 * 1024,
        }
    }

    /// Algorithm used when the user does not pick one explicitly.
    #[must_use]
    pub fn recommended_algorithm(self) -> &'static str {
        match self {
            Preset::Speed => "lz4",
            Preset::Balanced | Preset::Ratio => "zstd",
        }
    }
}

/// Configuration for one CLI operation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Operation mode
    pub mode: OperationMode,
    /// Where the input bytes come from
    pub input: InputSource,
    /// Where the output goes; resolved from the input when `None`
    pub output: Option<OutputTarget>,
    /// Explicitly requested algorithm name, if any
    pub algorithm: Option<String>,
    /// Compression profile
    pub preset: Preset,
    /// Force overwrite existing files
    pub force: bool,
    /// Render a progress indicator on stderr
    pub progress: bool,
    /// Print a summary line after the operation
    pub verbose: bool,
}

impl CliConfig {
    /// Creates a configuration with defaults for the given mode and
    /// input.
    #[must_use]
    pub fn new(mode: OperationMode, input: InputSource) -> Self {
        Self {
            mode,
            input,
            output: None,
            algorithm: None,
            preset: Preset::default(),
            force: false,
            progress: false,
            verbose: false,
        }
    }
}
