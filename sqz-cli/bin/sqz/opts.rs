//! Command line argument parsing for the sqz utility

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use sqz_cli::{CliConfig, InputSource, OperationMode, OutputTarget, Preset};

/// Multi-algorithm compression utility
#[derive(Parser, Debug)]
#[command(
    name = "sqz",
    version = "0.1.0",
    about = "Compress or decompress byte streams",
    long_about = "sqz compresses and decompresses files or piped data through a set of \
                 pluggable codec backends. Pass \"-\" as FILE to read standard input."
)]
pub struct SqzOpts {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a file or standard input
    Compress(CompressArgs),
    /// Decompress a file or standard input
    Decompress(DecompressArgs),
}

impl Command {
    /// Subcommand name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Compress(_) => "compress",
            Command::Decompress(_) => "decompress",
        }
    }

    /// Builds the operation configuration from the parsed arguments.
    pub fn into_config(self) -> CliConfig {
        match self {
            Command::Compress(args) => {
                let mut config =
                    CliConfig::new(OperationMode::Compress, input_source(&args.file));
                config.algorithm = args.algorithm;
                config.output = args.output.as_deref().map(output_target);
                config.preset = args.preset.into();
                config.force = args.force;
                config.progress = args.progress;
                config.verbose = args.verbose;
                config
            }
            Command::Decompress(args) => {
                let mut config =
                    CliConfig::new(OperationMode::Decompress, input_source(&args.file));
                config.algorithm = args.algorithm;
                config.output = args.output.as_deref().map(output_target);
                config.force = args.force;
                config.verbose = args.verbose;
                config
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct CompressArgs {
    /// File to compress, or "-" for standard input
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Algorithm to use instead of the preset's recommendation
    #[arg(short = 'a', long = "algorithm", value_name = "NAME")]
    pub algorithm: Option<String>,

    /// Output path, or "-" for standard output
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<String>,

    /// Compression profile
    #[arg(long = "preset", value_enum, default_value_t = PresetArg::Balanced)]
    pub preset: PresetArg,

    /// Force overwrite of output file
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Show a progress indicator on stderr
    #[arg(short = 'p', long = "progress")]
    pub progress: bool,

    /// Print a summary line after the operation
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct DecompressArgs {
    /// File to decompress, or "-" for standard input
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Algorithm to use instead of inferring it from the file extension
    #[arg(short = 'a', long = "algorithm", value_name = "NAME")]
    pub algorithm: Option<String>,

    /// Output path, or "-" for standard output
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<String>,

    /// Force overwrite of output file
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Print a summary line after the operation
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Compression profile accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// Prioritize throughput over output size
    Speed,
    /// Reasonable middle ground
    Balanced,
    /// Prioritize output size over throughput
    Ratio,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Speed => Preset::Speed,
            PresetArg::Balanced => Preset::Balanced,
            PresetArg::Ratio => Preset::Ratio,
        }
    }
}

fn input_source(file: &str) -> InputSource {
    if file == "-" {
        InputSource::Stdin
    } else {
        InputSource::File(PathBuf::from(file))
    }
}

fn output_target(path: &str) -> OutputTarget {
    if path == "-" {
        OutputTarget::Stdout
    } else {
        OutputTarget::File(PathBuf::from(path))
    }
}
