//! Buffered writer.
//!
//! [`BufWriter`] accumulates small writes in a fixed-capacity buffer and
//! hands them to the underlying [`Write`] sink in large chunks. Writes bigger
//! than the free space are split: whatever fits tops up the buffer, the
//! buffer is flushed, and the loop continues. When the buffer is empty, an
//! oversized write goes straight to the sink.
//!
//! # Failure latching
//!
//! The first sink error is stored. From then on every `write` and `flush`
//! fails with a copy of that error without touching the sink, until
//! [`reset`](BufWriter::reset) binds a new sink.
//!
//! # Example
//!
//! ```
//! use bufscan_core::BufWriter;
//!
//! let mut writer = BufWriter::with_capacity(8, Vec::new());
//! writer.write(b"hello, ").unwrap();
//! writer.write(b"world").unwrap();
//! writer.flush().unwrap();
//! assert_eq!(writer.get_ref(), b"hello, world");
//! ```

use crate::bytes;
use crate::config::BufConfig;
use crate::error::{BufError, Result};
use std::io::{self, Write};
use tracing::{trace, warn};

/// Buffer state shared by [`BufWriter`] and the async variant.
#[derive(Debug)]
pub(crate) struct WriterCore {
    /// Fixed-capacity buffer.
    buf: Vec<u8>,
    /// Number of bytes in `buf` waiting to be flushed.
    used: usize,
    /// First sink error, if any.
    last_error: Option<BufError>,
}

impl WriterCore {
    pub(crate) fn new(config: BufConfig) -> Self {
        Self {
            buf: vec![0u8; config.writer_capacity()],
            used: 0,
            last_error: None,
        }
    }

    /// Fail fast if an earlier operation latched an error.
    #[inline]
    pub(crate) fn check(&self) -> Result<()> {
        match &self.last_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Store `err` so every later operation fails with it.
    pub(crate) fn latch(&mut self, err: io::Error) -> BufError {
        let err = BufError::io_with_partial(err, self.pending());
        warn!(error = %err, "sink failed, writer is now unusable");
        self.last_error = Some(err.clone());
        err
    }

    pub(crate) fn size(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn available(&self) -> usize {
        self.buf.len() - self.used
    }

    pub(crate) fn buffered(&self) -> usize {
        self.used
    }

    pub(crate) fn pending(&self) -> &[u8] {
        &self.buf[..self.used]
    }

    /// Copy as much of `data` as fits into the free space.
    pub(crate) fn stage(&mut self, data: &[u8]) -> usize {
        let n = bytes::copy(data, &mut self.buf, self.used);
        self.used += n;
        n
    }

    /// Forget the flushed contents.
    pub(crate) fn clear(&mut self) {
        self.buf.fill(0);
        self.used = 0;
    }

    /// Drop buffered data and any latched error.
    pub(crate) fn reset(&mut self) {
        self.last_error = None;
        self.used = 0;
    }
}

/// A buffered writer over a [`Write`] sink.
#[derive(Debug)]
pub struct BufWriter<W: Write> {
    /// Underlying sink.
    writer: W,
    core: WriterCore,
}

impl<W: Write> BufWriter<W> {
    /// Create a new `BufWriter` with the default 4 KB buffer.
    pub fn new(writer: W) -> Self {
        Self::with_config(BufConfig::DEFAULT, writer)
    }

    /// Create a new `BufWriter` with the given buffer capacity.
    ///
    /// A capacity of zero falls back to the default.
    pub fn with_capacity(capacity: usize, writer: W) -> Self {
        Self::with_config(BufConfig::new(capacity), writer)
    }

    /// Create a new `BufWriter` from a configuration.
    pub fn with_config(config: BufConfig, writer: W) -> Self {
        Self {
            writer,
            core: WriterCore::new(config),
        }
    }

    /// Get the capacity of the internal buffer.
    pub fn size(&self) -> usize {
        self.core.size()
    }

    /// Get the number of bytes still free in the buffer.
    pub fn available(&self) -> usize {
        self.core.available()
    }

    /// Get the number of bytes waiting to be flushed.
    pub fn buffered(&self) -> usize {
        self.core.buffered()
    }

    /// Get the bytes waiting to be flushed.
    pub fn buffer(&self) -> &[u8] {
        self.core.pending()
    }

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying sink.
    ///
    /// Writing to it directly while data is buffered reorders output.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume this `BufWriter` and return the underlying sink.
    ///
    /// Unflushed data is lost.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Discard buffered data and any latched error, and write to `writer`
    /// from now on. Nothing is flushed.
    ///
    /// # Returns
    ///
    /// The previous sink.
    pub fn reset(&mut self, writer: W) -> W {
        self.core.reset();
        std::mem::replace(&mut self.writer, writer)
    }

    /// Write the buffered data to the sink.
    ///
    /// # Errors
    ///
    /// The latched error if an earlier operation failed; otherwise any sink
    /// error, which is latched.
    pub fn flush(&mut self) -> Result<()> {
        self.core.check()?;

        if self.core.buffered() > 0 {
            if let Err(e) = self.writer.write_all(self.core.pending()) {
                return Err(self.core.latch(e));
            }
            self.core.clear();
        }

        if let Err(e) = self.writer.flush() {
            return Err(self.core.latch(e));
        }
        Ok(())
    }

    /// Write `data`, flushing as needed.
    ///
    /// # Returns
    ///
    /// The number of bytes accepted, which is always `data.len()`.
    ///
    /// # Errors
    ///
    /// The latched error if an earlier operation failed; otherwise any sink
    /// error, which is latched.
    pub fn write(&mut self, mut data: &[u8]) -> Result<usize> {
        self.core.check()?;

        if data.is_empty() {
            return Ok(0);
        }

        let mut total = 0;
        while data.len() > self.core.available() {
            let written = if self.core.buffered() == 0 {
                // Large write, empty buffer: write directly to avoid a copy.
                trace!(len = data.len(), "writing directly to sink");
                match self.writer.write(data) {
                    Ok(0) => {
                        return Err(self.core.latch(io::Error::from(io::ErrorKind::WriteZero)));
                    }
                    Ok(n) => n,
                    Err(e) => return Err(self.core.latch(e)),
                }
            } else {
                let n = self.core.stage(data);
                self.flush()?;
                n
            };
            total += written;
            data = &data[written..];
        }

        total += self.core.stage(data);
        Ok(total)
    }
}

impl<W: Write> Write for BufWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(BufWriter::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(BufWriter::flush(self)?)
    }
}
