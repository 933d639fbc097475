//! Progress instrumentation for pipeline streams.
//!
//! [`ProgressReader`] and [`ProgressWriter`] wrap the ends of a pipeline
//! and report a running byte count to a [`ProgressObserver`] after every
//! successful transfer. They never alter the bytes passing through and
//! add no buffering of their own.

use std::io::{self, Read, Write};

/// Sentinel total meaning the stream length is unknown up front.
///
/// Observers receiving this total should render indeterminate progress
/// rather than a percentage.
pub const UNKNOWN_SIZE: u64 = 0;

/// Receiver for progress updates from an instrumented stream.
pub trait ProgressObserver {
    /// Called after each successful transfer with the cumulative byte
    /// count and the expected total ([`UNKNOWN_SIZE`] when unknown).
    fn update(&mut self, processed: u64, total: u64);
}

/// Observer that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn update(&mut self, _processed: u64, _total: u64) {}
}

/// Reader adapter counting the bytes pulled through it.
pub struct ProgressReader<R, O> {
    inner: R,
    observer: O,
    processed: u64,
    total: u64,
}

impl<R: Read, O: ProgressObserver> ProgressReader<R, O> {
    /// Wraps `inner`, reporting against `total` expected bytes.
    pub fn new(inner: R, observer: O, total: u64) -> Self {
        Self {
            inner,
            observer,
            processed: 0,
            total,
        }
    }

    /// Total bytes read through this wrapper so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }
}

impl<R: Read, O: ProgressObserver> Read for ProgressReader<R, O> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.processed += n as u64;
            self.observer.update(self.processed, self.total);
        }
        Ok(n)
    }
}

/// Writer adapter counting the bytes pushed through it.
pub struct ProgressWriter<W, O> {
    inner: W,
    observer: O,
    processed: u64,
    total: u64,
}

impl<W: Write, O: ProgressObserver> ProgressWriter<W, O> {
    /// Wraps `inner`, reporting against `total` expected bytes.
    pub fn new(inner: W, observer: O, total: u64) -> Self {
        Self {
            inner,
            observer,
            processed: 0,
            total,
        }
    }

    /// Total bytes written through this wrapper so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }
}

impl<W: Write, O: ProgressObserver> Write for ProgressWriter<W, O> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if n > 0 {
            self.processed += n as u64;
            self.observer.update(self.processed, self.total);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
