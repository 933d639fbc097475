//! The command workflow: validate the request, resolve the algorithm
//! and output, run the pipeline, then commit or roll back.

use std::io::{stdin, stdout, BufWriter, Read, Write};
use std::num::NonZeroUsize;
use std::path::{Component, Path};

use log::debug;
use sqz_core::progress::{ProgressReader, UNKNOWN_SIZE};
use sqz_core::{CodecFactory, CodecRegistry, PipelineOptions};

use crate::config::{CliConfig, OperationMode};
use crate::error::{Error, Result};
use crate::io::{
    default_compress_output, default_decompress_output, with_appended_extension, FileProvider,
    InputSource, OutputTarget, DEFAULT_BUFFER_SIZE, FALLBACK_EXTENSION,
};
use crate::operations;
use crate::reporter::{self, Reporter};

/// Runs one compress or decompress operation end to end.
///
/// Every request is validated and fully resolved before any stream is
/// opened, so a rejected request never touches the file system. If the
/// pipeline fails after the output file was created, the partial file
/// is removed before the error is returned.
///
/// # Errors
///
/// Returns an [`Error`] describing the first thing that went wrong;
/// see the variants for the full catalogue.
pub fn run(config: &CliConfig, registry: &CodecRegistry, fs: &dyn FileProvider) -> Result<()> {
    validate_request(config, fs)?;
    let factory = resolve_algorithm(config, registry)?;
    debug!("resolved algorithm: {}", factory.name());
    let output = resolve_output(config, factory.name(), registry, fs)?;
    debug!("resolved output: {output:?}");
    execute(config, factory, &output, fs)
}

fn validate_request(config: &CliConfig, fs: &dyn FileProvider) -> Result<()> {
    if let InputSource::File(path) = &config.input {
        validate_path(path)?;
        if !fs.exists(path) {
            return Err(Error::InputNotFound(path.clone()));
        }
        if !fs.is_readable_file(path) {
            return Err(Error::InputNotReadable(path.clone()));
        }
    }

    if let Some(OutputTarget::File(path)) = &config.output {
        validate_path(path)?;
    }

    Ok(())
}

/// Rejects paths that are empty, contain NUL bytes, or climb out of
/// their directory with `..` components.
fn validate_path(path: &Path) -> Result<()> {
    let rendered = path.to_string_lossy();
    if rendered.is_empty() {
        return Err(Error::InvalidPath {
            path: rendered.into_owned(),
            reason: "path is empty",
        });
    }
    if rendered.contains('\0') {
        return Err(Error::InvalidPath {
            path: rendered.into_owned(),
            reason: "path contains a NUL byte",
        });
    }
    if path
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(Error::InvalidPath {
            path: rendered.into_owned(),
            reason: "parent directory components are not allowed",
        });
    }
    Ok(())
}

fn resolve_algorithm<'a>(
    config: &CliConfig,
    registry: &'a CodecRegistry,
) -> Result<&'a dyn CodecFactory> {
    // An explicit request always wins, even over an inferable extension.
    let name = if let Some(name) = &config.algorithm {
        name.clone()
    } else {
        match config.mode {
            OperationMode::Compress => config.preset.recommended_algorithm().to_owned(),
            OperationMode::Decompress => match &config.input {
                InputSource::File(path) => path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .filter(|ext| registry.find(ext).is_some())
                    .map(str::to_owned)
                    .ok_or_else(|| Error::AlgorithmNotInferable(path.clone()))?,
                InputSource::Stdin => return Err(Error::AlgorithmRequiredForStdin),
            },
        }
    };

    registry.find(&name).ok_or_else(|| Error::UnknownAlgorithm {
        name,
        supported: registry.supported_names().join(", "),
    })
}

fn resolve_output(
    config: &CliConfig,
    algorithm: &str,
    registry: &CodecRegistry,
    fs: &dyn FileProvider,
) -> Result<OutputTarget> {
    let target = if let Some(target) = &config.output {
        if let OutputTarget::File(path) = target {
            if let InputSource::File(input) = &config.input {
                // Lexical comparison; resolving symlinks is out of scope.
                if input == path {
                    return Err(Error::SameFile(path.clone()));
                }
            }
            if fs.exists(path) && !config.force {
                return Err(Error::OutputExists(path.clone()));
            }
        }
        target.clone()
    } else {
        match &config.input {
            // Piped input defaults to piped output.
            InputSource::Stdin => OutputTarget::Stdout,
            InputSource::File(input) => {
                let path = match config.mode {
                    OperationMode::Compress => {
                        let default = default_compress_output(input, algorithm);
                        if fs.exists(&default) && !config.force {
                            return Err(Error::OutputExists(default));
                        }
                        default
                    }
                    OperationMode::Decompress => {
                        let default = default_decompress_output(input, &registry.supported_names());
                        pick_free_name(default.as_path(), config.force, fs)?
                    }
                };
                OutputTarget::File(path)
            }
        }
    };

    if let OutputTarget::File(path) = &target {
        prepare_output_dir(path, config.mode, fs)?;
    }

    Ok(target)
}

/// Keeps a derived decompression output name from silently clobbering
/// an existing file: one `.out` suffix is tried before giving up.
fn pick_free_name(
    default: &Path,
    force: bool,
    fs: &dyn FileProvider,
) -> Result<std::path::PathBuf> {
    if force || !fs.exists(default) {
        return Ok(default.to_path_buf());
    }

    let fallback = with_appended_extension(default, FALLBACK_EXTENSION);
    if fs.exists(&fallback) {
        return Err(Error::OutputExists(fallback));
    }
    Ok(fallback)
}

fn prepare_output_dir(path: &Path, mode: OperationMode, fs: &dyn FileProvider) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    match mode {
        // Restoring into a directory structure that no longer exists is
        // routine for decompression, so missing parents are created.
        OperationMode::Decompress => {
            if !fs.exists(parent) {
                fs.create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            Ok(())
        }
        OperationMode::Compress => {
            if !fs.is_writable_dir(parent) {
                return Err(Error::OutputDirUnwritable(parent.to_path_buf()));
            }
            Ok(())
        }
    }
}

fn execute(
    config: &CliConfig,
    factory: &dyn CodecFactory,
    output: &OutputTarget,
    fs: &dyn FileProvider,
) -> Result<()> {
    let chunk_size = NonZeroUsize::new(config.preset.chunk_size()).unwrap_or(NonZeroUsize::MIN);
    let options = PipelineOptions::default()
        .with_chunk_size(chunk_size)
        .with_level(config.preset.level());

    let total = match &config.input {
        InputSource::File(path) => fs.size(path).unwrap_or(UNKNOWN_SIZE),
        InputSource::Stdin => UNKNOWN_SIZE,
    };

    let reporter = Reporter::new(reporter::should_report(config.progress, output), total);
    let mut output_created = false;
    let result = pump_streams(config, factory, output, fs, &options, total, &reporter, &mut output_created);

    // The indicator is cleared no matter how the operation ended.
    reporter.finish();

    match result {
        Ok(summary) => {
            if config.verbose {
                operations::report_summary(&summary, config.mode == OperationMode::Compress);
            }
            Ok(())
        }
        Err(err) => {
            // Only a file this run created is deleted; a failure before
            // that point must leave any pre-existing output untouched.
            if output_created {
                if let OutputTarget::File(path) = output {
                    if let Err(remove_err) = fs.remove_file(path) {
                        debug!(
                            "could not remove partial output '{}': {remove_err}",
                            path.display()
                        );
                    }
                }
            }
            Err(err)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn pump_streams(
    config: &CliConfig,
    factory: &dyn CodecFactory,
    output: &OutputTarget,
    fs: &dyn FileProvider,
    options: &PipelineOptions,
    total: u64,
    reporter: &Reporter,
    output_created: &mut bool,
) -> Result<sqz_core::StreamSummary> {
    let reader: Box<dyn Read> = match &config.input {
        InputSource::File(path) => fs.open_input(path).map_err(|source| Error::OpenInput {
            path: path.clone(),
            source,
        })?,
        InputSource::Stdin => Box::new(stdin()),
    };
    let reader = ProgressReader::new(reader, reporter.observer(), total);

    let writer: Box<dyn Write> = match output {
        OutputTarget::File(path) => {
            let writer = fs.create_output(path).map_err(|source| Error::CreateOutput {
                path: path.clone(),
                source,
            })?;
            *output_created = true;
            writer
        }
        OutputTarget::Stdout => Box::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, stdout())),
    };

    // The writer is moved into the pipeline call, so by the time the
    // result comes back the output file handle is closed and a partial
    // file can be removed.
    match config.mode {
        OperationMode::Compress => operations::compress_stream(reader, writer, factory, options),
        OperationMode::Decompress => operations::decompress_stream(reader, writer, factory, options),
    }
}
