//! Buffered reader with delimiter scanning.
//!
//! [`BufReader`] wraps a [`ByteSource`] with a fixed-capacity buffer and two
//! cursors: `r` (next unread byte) and `w` (end of valid data), with
//! `0 <= r <= w <= capacity`. Bytes before `r` are stale and reclaimed by
//! sliding the pending region down on the next fill.
//!
//! # Borrowed results
//!
//! [`read_slice`](BufReader::read_slice), [`peek`](BufReader::peek) and
//! [`read_line`](BufReader::read_line) hand out views into the internal
//! buffer. They borrow the reader, so the next read cannot happen while a
//! view is alive. Use [`read_slice_owned`](BufReader::read_slice_owned) or
//! copy the data when it has to outlive the next call.
//!
//! # Example
//!
//! ```
//! use bufscan_core::BufReader;
//!
//! let mut reader = BufReader::new(&b"first line\r\nsecond\n"[..]);
//!
//! let line = reader.read_line().unwrap().unwrap();
//! assert_eq!(&*line.line, b"first line");
//! assert!(!line.more);
//!
//! assert_eq!(reader.read_string(" ").unwrap().as_deref(), Some("second\n"));
//! assert!(reader.read_line().unwrap().is_none());
//! ```

use crate::bytes;
use crate::config::BufConfig;
use crate::error::{BufError, Result};
use crate::source::{ByteSource, checked_count};
use std::borrow::Cow;
use tracing::{debug, trace, warn};

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// One line returned by [`BufReader::read_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadLine<'a> {
    /// Line contents without the trailing `\n` or `\r\n`.
    ///
    /// Borrowed from the reader's buffer for complete lines, owned when the
    /// line was cut short by the buffer capacity.
    pub line: Cow<'a, [u8]>,
    /// `true` if the line did not fit in the buffer and continues on the
    /// next call.
    pub more: bool,
}

impl ReadLine<'_> {
    /// Detach the line from the reader's buffer.
    pub fn into_owned(self) -> ReadLine<'static> {
        ReadLine {
            line: Cow::Owned(self.line.into_owned()),
            more: self.more,
        }
    }
}

/// A buffered reader over a [`ByteSource`].
#[derive(Debug)]
pub struct BufReader<S> {
    /// Underlying source.
    source: S,
    /// Fixed-capacity buffer.
    buf: Vec<u8>,
    /// Read cursor.
    r: usize,
    /// Write cursor.
    w: usize,
    /// Source reported end of stream.
    eof: bool,
    /// Tolerated consecutive empty reads.
    max_empty_reads: usize,
}

impl<S: ByteSource> BufReader<S> {
    /// Create a new `BufReader` with the default 4 KB buffer.
    pub fn new(source: S) -> Self {
        Self::with_config(BufConfig::DEFAULT, source)
    }

    /// Create a new `BufReader` with the given buffer capacity.
    ///
    /// Capacities below [`MIN_BUF_SIZE`](crate::config::sizes::MIN_BUF_SIZE)
    /// are raised to it.
    pub fn with_capacity(capacity: usize, source: S) -> Self {
        Self::with_config(BufConfig::new(capacity), source)
    }

    /// Create a new `BufReader` from a configuration.
    pub fn with_config(config: BufConfig, source: S) -> Self {
        Self {
            source,
            buf: vec![0u8; config.reader_capacity()],
            r: 0,
            w: 0,
            eof: false,
            max_empty_reads: config.max_empty_reads.max(1),
        }
    }

    /// Get the capacity of the internal buffer.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Get the number of bytes that can be read from the buffer without
    /// touching the source.
    pub fn buffered(&self) -> usize {
        self.w - self.r
    }

    /// Check whether the source has reported end of stream.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    ///
    /// Reading from it directly skips whatever is still buffered.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume this `BufReader` and return the underlying source.
    ///
    /// Buffered data is lost.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Discard all buffered data and state and read from `source` instead.
    ///
    /// # Returns
    ///
    /// The previous source.
    pub fn reset(&mut self, source: S) -> S {
        self.r = 0;
        self.w = 0;
        self.eof = false;
        std::mem::replace(&mut self.source, source)
    }

    /// Read a new chunk into the buffer.
    fn fill(&mut self) -> Result<()> {
        // Slide existing data to the beginning.
        if self.r > 0 {
            self.buf.copy_within(self.r..self.w, 0);
            self.w -= self.r;
            self.r = 0;
        }

        // Unreachable through the public operations.
        if self.w >= self.buf.len() {
            return Err(BufError::FillFull);
        }

        // Read new data: try a limited number of times.
        for _ in 0..self.max_empty_reads {
            match self.source.read_into(&mut self.buf[self.w..])? {
                None => {
                    self.eof = true;
                    return Ok(());
                }
                Some(n) => {
                    self.w += checked_count(n, self.buf.len() - self.w)?;
                    if n > 0 {
                        return Ok(());
                    }
                }
            }
        }

        warn!(
            attempts = self.max_empty_reads,
            "source made no progress and did not signal end of stream"
        );
        Err(BufError::no_progress(self.max_empty_reads))
    }

    /// Read data into `dest`.
    ///
    /// At most one read is issued to the source. When the buffer is empty and
    /// `dest` is at least as large as it, the source reads straight into
    /// `dest`.
    ///
    /// # Returns
    ///
    /// `Some(n)` with the number of bytes delivered (possibly 0 if the source
    /// had nothing yet), or `None` at end of stream.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<Option<usize>> {
        if dest.is_empty() {
            return Ok(Some(0));
        }

        if self.r == self.w {
            if self.eof {
                return Ok(None);
            }

            if dest.len() >= self.buf.len() {
                // Large read, empty buffer: avoid the copy.
                trace!(len = dest.len(), "reading directly into caller buffer");
                let len = dest.len();
                return match self.source.read_into(dest)? {
                    None => {
                        self.eof = true;
                        Ok(None)
                    }
                    Some(n) => Ok(Some(checked_count(n, len)?)),
                };
            }

            // One read only; do not use fill, which loops.
            self.r = 0;
            self.w = 0;
            match self.source.read_into(&mut self.buf)? {
                None => {
                    self.eof = true;
                    return Ok(None);
                }
                Some(0) => return Ok(Some(0)),
                Some(n) => self.w = checked_count(n, self.buf.len())?,
            }
        }

        let copied = bytes::copy(&self.buf[self.r..self.w], dest, 0);
        self.r += copied;
        Ok(Some(copied))
    }

    /// Read exactly `dest.len()` bytes.
    ///
    /// # Returns
    ///
    /// `Some(dest.len())` on success, or `None` if the stream ended before a
    /// single byte was read.
    ///
    /// # Errors
    ///
    /// [`BufError::PartialRead`] if the stream ended part-way; its payload
    /// holds the bytes that were read. Source errors carry the same payload.
    pub fn read_full(&mut self, dest: &mut [u8]) -> Result<Option<usize>> {
        let mut filled = 0;
        let mut empty_reads = 0;

        while filled < dest.len() {
            match self.read(&mut dest[filled..]) {
                Ok(None) if filled == 0 => return Ok(None),
                Ok(None) => return Err(BufError::partial_read(&dest[..filled])),
                Ok(Some(0)) => {
                    empty_reads += 1;
                    if empty_reads >= self.max_empty_reads {
                        return Err(BufError::no_progress(empty_reads));
                    }
                }
                Ok(Some(n)) => {
                    filled += n;
                    empty_reads = 0;
                }
                Err(e) => return Err(e.with_partial(&dest[..filled])),
            }
        }

        Ok(Some(filled))
    }

    /// Read a single byte.
    ///
    /// # Returns
    ///
    /// The byte, or `None` at end of stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        while self.r == self.w {
            if self.eof {
                return Ok(None);
            }
            self.fill()?; // buffer is empty
        }
        let byte = self.buf[self.r];
        self.r += 1;
        Ok(Some(byte))
    }

    /// Locate the next delimited slice and consume it.
    ///
    /// Returns the `[start, end)` range of the slice in `buf`.
    fn scan_slice(&mut self, delim: u8) -> Result<Option<(usize, usize)>> {
        // Bytes past `r` already searched.
        let mut scanned = 0;

        loop {
            if let Some(i) = bytes::index_of_from(&self.buf[..self.w], &[delim], self.r + scanned)
            {
                let start = self.r;
                self.r = i + 1;
                return Ok(Some((start, i + 1)));
            }

            if self.eof {
                if self.r == self.w {
                    return Ok(None);
                }
                let start = self.r;
                self.r = self.w;
                return Ok(Some((start, self.w)));
            }

            if self.buffered() >= self.buf.len() {
                self.r = self.w;
                // The payload takes the current buffer; reading continues in
                // a copy so later reads never touch what the caller holds.
                let fresh = self.buf.clone();
                let full = std::mem::replace(&mut self.buf, fresh);
                debug!(capacity = full.len(), delim, "buffer full before delimiter");
                return Err(BufError::buffer_full(full));
            }

            // Do not rescan the area we scanned before.
            scanned = self.w - self.r;

            if let Err(e) = self.fill() {
                return Err(e.with_partial(&self.buf[self.r..self.w]));
            }
        }
    }

    /// Read until the first occurrence of `delim`.
    ///
    /// # Returns
    ///
    /// A view into the internal buffer ending with (and including) `delim`.
    /// At end of stream the remaining bytes are returned without a
    /// delimiter; `None` once nothing is left.
    ///
    /// # Errors
    ///
    /// [`BufError::BufferFull`] if the buffer fills before `delim` is found.
    /// The payload holds the entire buffer, and those bytes are consumed.
    pub fn read_slice(&mut self, delim: u8) -> Result<Option<&[u8]>> {
        let range = self.scan_slice(delim)?;
        Ok(range.map(|(start, end)| &self.buf[start..end]))
    }

    /// Like [`read_slice`](Self::read_slice), but returns an owned copy.
    pub fn read_slice_owned(&mut self, delim: u8) -> Result<Option<Vec<u8>>> {
        Ok(self.read_slice(delim)?.map(<[u8]>::to_vec))
    }

    /// Read until the first occurrence of `delim` and decode the result as
    /// UTF-8 text, delimiter included.
    ///
    /// # Errors
    ///
    /// [`BufError::InvalidArgument`] if `delim` is not exactly one byte long,
    /// plus anything [`read_slice`](Self::read_slice) returns.
    pub fn read_string(&mut self, delim: &str) -> Result<Option<String>> {
        let &[byte] = delim.as_bytes() else {
            return Err(BufError::invalid_argument(
                "delimiter should be a single byte character",
            ));
        };
        Ok(self.read_slice(byte)?.map(bytes::decode_utf8))
    }

    /// Read one line, stripping the trailing `\n` or `\r\n`.
    ///
    /// If the line is longer than the buffer, the first buffer-full of it is
    /// returned with `more` set, and the rest comes back on subsequent calls.
    /// A `\r` that lands as the last byte of such a fragment is held back
    /// until the next call, so a `\r\n` split across the buffer boundary is
    /// still recognised.
    ///
    /// # Returns
    ///
    /// The line, or `None` once the stream is exhausted.
    pub fn read_line(&mut self) -> Result<Option<ReadLine<'_>>> {
        let (start, end) = match self.scan_slice(LF) {
            Ok(Some(range)) => range,
            Ok(None) => return Ok(None),
            Err(BufError::BufferFull { mut partial }) => {
                // Handle the "\r\n" case.
                if !self.eof && partial.last() == Some(&CR) {
                    // Put the '\r' back on buf and drop it from line.
                    debug_assert!(self.r > 0, "tried to rewind past start of buffer");
                    self.r -= 1;
                    partial.pop();
                }
                return Ok(Some(ReadLine {
                    line: Cow::Owned(partial),
                    more: !self.eof,
                }));
            }
            Err(e) => return Err(e),
        };

        let mut line = &self.buf[start..end];
        if line.last() == Some(&LF) {
            let drop = if line.len() > 1 && line[line.len() - 2] == CR {
                2
            } else {
                1
            };
            line = &line[..line.len() - drop];
        }

        Ok(Some(ReadLine {
            line: Cow::Borrowed(line),
            more: false,
        }))
    }

    /// Return the next `n` bytes without consuming them.
    ///
    /// # Returns
    ///
    /// Exactly `n` bytes, fewer if the stream ends first, or `None` at end of
    /// stream with nothing buffered.
    ///
    /// # Errors
    ///
    /// [`BufError::BufferFull`] if `n` exceeds the buffer capacity. The
    /// payload holds the buffered bytes, which stay unconsumed.
    pub fn peek(&mut self, n: usize) -> Result<Option<&[u8]>> {
        let mut avail = self.buffered();
        while avail < n && avail < self.buf.len() && !self.eof {
            if let Err(e) = self.fill() {
                return Err(e.with_partial(&self.buf[self.r..self.w]));
            }
            avail = self.buffered();
        }

        if avail == 0 && self.eof {
            return Ok(None);
        }
        if avail < n && self.eof {
            return Ok(Some(&self.buf[self.r..self.w]));
        }
        if avail < n {
            debug!(requested = n, capacity = self.buf.len(), "peek exceeds buffer");
            return Err(BufError::buffer_full(&self.buf[self.r..self.w]));
        }

        Ok(Some(&self.buf[self.r..self.r + n]))
    }
}
