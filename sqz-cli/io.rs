//! Stream endpoints and file system access for CLI operations.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Default buffer size for file I/O operations
pub const DEFAULT_BUFFER_SIZE: usize = 512 * 1024;

/// Fallback extension when a stripped output name would collide or no
/// recognized extension can be stripped.
pub const FALLBACK_EXTENSION: &str = "out";

/// Where the input bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A named file on disk.
    File(PathBuf),
    /// The standard input stream.
    Stdin,
}

impl InputSource {
    /// The file path, if this source is backed by one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            InputSource::File(path) => Some(path),
            InputSource::Stdin => None,
        }
    }
}

/// Where the output bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A named file on disk.
    File(PathBuf),
    /// The standard output stream.
    Stdout,
}

impl OutputTarget {
    /// The file path, if this target is backed by one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputTarget::File(path) => Some(path),
            OutputTarget::Stdout => None,
        }
    }
}

/// File system operations the command workflow depends on.
///
/// Abstracted behind a trait so tests can run the full workflow against
/// an in-memory stand-in and inspect what was created or deleted.
pub trait FileProvider {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a regular file that can be opened for reading.
    fn is_readable_file(&self, path: &Path) -> bool;

    /// Whether `path` is a directory that accepts new files.
    fn is_writable_dir(&self, path: &Path) -> bool;

    /// Size of the file at `path` in bytes, if it can be determined.
    fn size(&self, path: &Path) -> Option<u64>;

    /// Opens `path` for buffered reading.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the file cannot be opened.
    fn open_input(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Creates or truncates `path` for buffered writing.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the file cannot be created.
    fn create_output(&self, path: &Path) -> io::Result<Box<dyn Write>>;

    /// Removes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if removal fails.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Creates `path` and any missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if creation fails.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`FileProvider`] backed by the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFiles;

impl FileProvider for LocalFiles {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_readable_file(&self, path: &Path) -> bool {
        fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
            && File::open(path).is_ok()
    }

    fn is_writable_dir(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|meta| meta.is_dir() && !meta.permissions().readonly())
            .unwrap_or(false)
    }

    fn size(&self, path: &Path) -> Option<u64> {
        fs::metadata(path).ok().map(|meta| meta.len())
    }

    fn open_input(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)))
    }

    fn create_output(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file)))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

/// Default compressed output name: the input name with the algorithm's
/// extension appended.
#[must_use]
pub fn default_compress_output(input: &Path, algorithm: &str) -> PathBuf {
    with_appended_extension(input, algorithm)
}

/// Default decompressed output name.
///
/// Strips a trailing `.{name}` extension matching any supported
/// algorithm (case-insensitive); when none matches, appends the
/// [`FALLBACK_EXTENSION`] instead so the input is never the output.
#[must_use]
pub fn default_decompress_output(input: &Path, supported: &[&str]) -> PathBuf {
    if let Some(name) = input.file_name().and_then(|name| name.to_str()) {
        for algorithm in supported {
            let suffix = format!(".{algorithm}");
            if name.len() > suffix.len()
                && name[name.len() - suffix.len()..].eq_ignore_ascii_case(&suffix)
            {
                return input.with_file_name(&name[..name.len() - suffix.len()]);
            }
        }
    }
    with_appended_extension(input, FALLBACK_EXTENSION)
}

/// Appends `.{suffix}` to the final path component, preserving any
/// existing extension.
#[must_use]
pub fn with_appended_extension(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(format!(".{suffix}"));
    path.with_file_name(name)
}
