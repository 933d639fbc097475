//! Workflow tests running the full command pipeline against real files.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use sqz_core::{Codec, CodecError, CodecFactory, CodecRegistry, CompressionLevel, Mode};
use tempfile::TempDir;

use crate::config::{CliConfig, OperationMode, Preset};
use crate::error::Error;
use crate::io::{FileProvider, InputSource, LocalFiles, OutputTarget};
use crate::process::run;

const PAYLOAD: &[u8] = b"workflow payload: the quick brown fox jumps over the lazy dog";

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn compress_config(input: &Path) -> CliConfig {
    CliConfig::new(OperationMode::Compress, InputSource::File(input.to_path_buf()))
}

fn decompress_config(input: &Path) -> CliConfig {
    CliConfig::new(
        OperationMode::Decompress,
        InputSource::File(input.to_path_buf()),
    )
}

fn run_local(config: &CliConfig) -> crate::error::Result<()> {
    run(config, &CodecRegistry::with_builtin(), &LocalFiles)
}

#[test]
fn round_trip_every_algorithm() {
    for algorithm in ["zlib", "lz4", "zstd"] {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "data.txt", PAYLOAD);

        let mut config = compress_config(&input);
        config.algorithm = Some(algorithm.to_owned());
        run_local(&config).unwrap();

        let compressed = dir.path().join(format!("data.txt.{algorithm}"));
        assert!(compressed.exists());
        assert_ne!(fs::read(&compressed).unwrap(), PAYLOAD);

        let restored = dir.path().join("restored.txt");
        let mut config = decompress_config(&compressed);
        config.output = Some(OutputTarget::File(restored.clone()));
        run_local(&config).unwrap();

        assert_eq!(fs::read(&restored).unwrap(), PAYLOAD);
    }
}

#[test]
fn round_trip_empty_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "empty", b"");

    let mut config = compress_config(&input);
    config.algorithm = Some("zstd".to_owned());
    run_local(&config).unwrap();

    let compressed = dir.path().join("empty.zstd");
    assert!(fs::metadata(&compressed).unwrap().len() > 0);

    let restored = dir.path().join("empty.restored");
    let mut config = decompress_config(&compressed);
    config.output = Some(OutputTarget::File(restored.clone()));
    run_local(&config).unwrap();

    assert_eq!(fs::metadata(&restored).unwrap().len(), 0);
}

#[test]
fn compress_uses_preset_recommendation_by_default() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    // Balanced recommends zstd.
    run_local(&compress_config(&input)).unwrap();
    assert!(dir.path().join("data.txt.zstd").exists());

    let mut config = compress_config(&input);
    config.preset = Preset::Speed;
    run_local(&config).unwrap();
    assert!(dir.path().join("data.txt.lz4").exists());
}

#[test]
fn explicit_algorithm_overrides_extension_inference() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    let mut config = compress_config(&input);
    config.algorithm = Some("zlib".to_owned());
    run_local(&config).unwrap();

    // The file says .zlib, but the user insists it is zstd; the explicit
    // choice wins and the decode fails on the mismatched stream.
    let compressed = dir.path().join("data.txt.zlib");
    let mut config = decompress_config(&compressed);
    config.algorithm = Some("zstd".to_owned());
    config.output = Some(OutputTarget::File(dir.path().join("restored")));
    let err = run_local(&config).unwrap_err();
    assert!(matches!(err, Error::Codec { .. }));
}

#[test]
fn decompress_strips_extension_and_avoids_clobbering_original() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    let mut config = compress_config(&input);
    config.algorithm = Some("lz4".to_owned());
    run_local(&config).unwrap();

    // "data.txt" still exists, so the stripped default name collides and
    // the fallback suffix is used instead.
    let compressed = dir.path().join("data.txt.lz4");
    run_local(&decompress_config(&compressed)).unwrap();

    let fallback = dir.path().join("data.txt.out");
    assert_eq!(fs::read(&fallback).unwrap(), PAYLOAD);
    assert_eq!(fs::read(&input).unwrap(), PAYLOAD);
}

#[test]
fn decompress_without_inferable_extension_requires_algorithm() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.bin", PAYLOAD);

    let err = run_local(&decompress_config(&input)).unwrap_err();
    assert!(matches!(err, Error::AlgorithmNotInferable(_)));
}

#[test]
fn stdin_decompress_requires_algorithm() {
    let config = CliConfig::new(OperationMode::Decompress, InputSource::Stdin);
    let err = run_local(&config).unwrap_err();
    assert!(matches!(err, Error::AlgorithmRequiredForStdin));
}

#[test]
fn unknown_algorithm_lists_supported_names() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    let mut config = compress_config(&input);
    config.algorithm = Some("brotli".to_owned());
    let err = run_local(&config).unwrap_err();
    match err {
        Error::UnknownAlgorithm { name, supported } => {
            assert_eq!(name, "brotli");
            assert_eq!(supported, "lz4, zlib, zstd");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn algorithm_lookup_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    let mut config = compress_config(&input);
    config.algorithm = Some("ZSTD".to_owned());
    run_local(&config).unwrap();
    // The canonical lowercase name is used for the extension.
    assert!(dir.path().join("data.txt.zstd").exists());
}

#[test]
fn missing_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = compress_config(&dir.path().join("absent.txt"));
    let err = run_local(&config).unwrap_err();
    assert!(matches!(err, Error::InputNotFound(_)));
}

#[test]
fn parent_directory_components_are_rejected() {
    let dir = TempDir::new().unwrap();
    let sneaky = dir.path().join("..").join("data.txt");
    let err = run_local(&compress_config(&sneaky)).unwrap_err();
    assert!(matches!(err, Error::InvalidPath { .. }));
}

#[test]
fn compress_default_output_collision_requires_force() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    let mut config = compress_config(&input);
    config.algorithm = Some("zstd".to_owned());
    run_local(&config).unwrap();

    // The default name is now taken; a repeat run must not pick a new
    // name silently.
    let err = run_local(&config).unwrap_err();
    assert!(matches!(err, Error::OutputExists(_)));

    config.force = true;
    run_local(&config).unwrap();
}

#[test]
fn existing_output_requires_force() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);
    let output = write_file(&dir, "taken", b"precious");

    let mut config = compress_config(&input);
    config.algorithm = Some("zstd".to_owned());
    config.output = Some(OutputTarget::File(output.clone()));
    let err = run_local(&config).unwrap_err();
    assert!(matches!(err, Error::OutputExists(_)));
    assert_eq!(fs::read(&output).unwrap(), b"precious");

    config.force = true;
    run_local(&config).unwrap();
    assert_ne!(fs::read(&output).unwrap(), b"precious");
}

#[test]
fn output_must_differ_from_input() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    let mut config = compress_config(&input);
    config.output = Some(OutputTarget::File(input.clone()));
    config.force = true;
    let err = run_local(&config).unwrap_err();
    assert!(matches!(err, Error::SameFile(_)));
    assert_eq!(fs::read(&input).unwrap(), PAYLOAD);
}

#[test]
fn decompress_creates_missing_output_directories() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    let mut config = compress_config(&input);
    config.algorithm = Some("zlib".to_owned());
    run_local(&config).unwrap();

    let nested = dir.path().join("a").join("b").join("restored.txt");
    let mut config = decompress_config(&dir.path().join("data.txt.zlib"));
    config.output = Some(OutputTarget::File(nested.clone()));
    run_local(&config).unwrap();
    assert_eq!(fs::read(&nested).unwrap(), PAYLOAD);
}

#[test]
fn compress_into_missing_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    let mut config = compress_config(&input);
    config.output = Some(OutputTarget::File(dir.path().join("no-such-dir").join("out")));
    let err = run_local(&config).unwrap_err();
    assert!(matches!(err, Error::OutputDirUnwritable(_)));
}

#[test]
fn failed_decompress_removes_partial_output() {
    let dir = TempDir::new().unwrap();
    let garbage = write_file(&dir, "data.zlib", b"definitely not a zlib stream");

    let output = dir.path().join("restored");
    let mut config = decompress_config(&garbage);
    config.output = Some(OutputTarget::File(output.clone()));
    let err = run_local(&config).unwrap_err();
    assert!(matches!(err, Error::Codec { .. }));
    assert!(!output.exists());
}

#[test]
fn failed_decompress_removes_default_output_too() {
    let dir = TempDir::new().unwrap();
    // Valid prefix then truncation: the decode starts producing output
    // before the stream runs out.
    let input = write_file(&dir, "data.txt", &PAYLOAD.repeat(500));
    let mut config = compress_config(&input);
    config.algorithm = Some("zstd".to_owned());
    run_local(&config).unwrap();

    let compressed_path = dir.path().join("data.txt.zstd");
    let compressed = fs::read(&compressed_path).unwrap();
    fs::write(&compressed_path, &compressed[..compressed.len() / 2]).unwrap();

    let mut config = decompress_config(&compressed_path);
    config.output = Some(OutputTarget::File(dir.path().join("restored")));
    let err = run_local(&config).unwrap_err();
    assert!(matches!(err, Error::Codec { .. }));
    assert!(!dir.path().join("restored").exists());
}

#[test]
fn failed_output_creation_leaves_existing_file_alone() {
    /// Delegates to the real file system but refuses to create outputs,
    /// recording every removal request.
    struct ReadOnlyOutputs {
        removed: RefCell<Vec<PathBuf>>,
    }

    impl FileProvider for ReadOnlyOutputs {
        fn exists(&self, path: &Path) -> bool {
            LocalFiles.exists(path)
        }
        fn is_readable_file(&self, path: &Path) -> bool {
            LocalFiles.is_readable_file(path)
        }
        fn is_writable_dir(&self, path: &Path) -> bool {
            LocalFiles.is_writable_dir(path)
        }
        fn size(&self, path: &Path) -> Option<u64> {
            LocalFiles.size(path)
        }
        fn open_input(&self, path: &Path) -> io::Result<Box<dyn Read>> {
            LocalFiles.open_input(path)
        }
        fn create_output(&self, _path: &Path) -> io::Result<Box<dyn Write>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn remove_file(&self, path: &Path) -> io::Result<()> {
            self.removed.borrow_mut().push(path.to_path_buf());
            LocalFiles.remove_file(path)
        }
        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            LocalFiles.create_dir_all(path)
        }
    }

    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);
    let output = write_file(&dir, "taken", b"precious");

    let mut config = compress_config(&input);
    config.algorithm = Some("zstd".to_owned());
    config.output = Some(OutputTarget::File(output.clone()));
    config.force = true;

    let fs_stub = ReadOnlyOutputs {
        removed: RefCell::new(Vec::new()),
    };
    let err = run(&config, &CodecRegistry::with_builtin(), &fs_stub).unwrap_err();
    assert!(matches!(err, Error::CreateOutput { .. }));

    // Nothing was created, so nothing may be deleted.
    assert!(fs_stub.removed.borrow().is_empty());
    assert_eq!(fs::read(&output).unwrap(), b"precious");
}

#[test]
fn custom_registry_is_honoured() {
    struct Broken;
    impl CodecFactory for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn create(
            &self,
            _mode: Mode,
            _level: CompressionLevel,
        ) -> Result<Box<dyn Codec>, CodecError> {
            Err(CodecError::new("backend unavailable"))
        }
    }

    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.txt", PAYLOAD);

    let mut registry = CodecRegistry::new();
    registry.register(Box::new(Broken));

    let mut config = compress_config(&input);
    config.algorithm = Some("broken".to_owned());
    let err = run(&config, &registry, &LocalFiles).unwrap_err();
    assert!(matches!(err, Error::Codec { .. }));
    // The failed operation must not leave a partial output behind.
    assert!(!dir.path().join("data.txt.broken").exists());
}
