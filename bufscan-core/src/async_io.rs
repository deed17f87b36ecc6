//! Async buffered writer.
//!
//! [`AsyncBufWriter`] is the suspending counterpart of
//! [`BufWriter`](crate::BufWriter): same buffer, same overflow handling, same
//! failure latching, but every sink interaction is an `.await` on a Tokio
//! [`AsyncWrite`].
//!
//! # Example
//!
//! ```rust,ignore
//! use bufscan_core::async_io::AsyncBufWriter;
//!
//! let file = tokio::fs::File::create("out.log").await?;
//! let mut writer = AsyncBufWriter::new(file);
//! writer.write(b"line 1\n").await?;
//! writer.write(b"line 2\n").await?;
//! writer.flush().await?;
//! ```
//!
//! # Feature Flag
//!
//! This module is only available when the `async-io` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! bufscan-core = { version = "0.1.0", features = ["async-io"] }
//! ```

use crate::config::BufConfig;
use crate::error::Result;
use crate::writer::WriterCore;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// A buffered writer over an async sink.
#[derive(Debug)]
pub struct AsyncBufWriter<W> {
    writer: W,
    core: WriterCore,
}

impl<W: AsyncWrite + Unpin> AsyncBufWriter<W> {
    /// Create a new writer with the default 4 KB buffer.
    pub fn new(writer: W) -> Self {
        Self::with_config(BufConfig::DEFAULT, writer)
    }

    /// Create a new writer with the given buffer capacity.
    ///
    /// A capacity of zero falls back to the default.
    pub fn with_capacity(capacity: usize, writer: W) -> Self {
        Self::with_config(BufConfig::new(capacity), writer)
    }

    /// Create a new writer from a configuration.
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
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the writer and return the underlying sink.
    ///
    /// Unflushed data is lost.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Discard buffered data and any latched error, and write to `writer`
    /// from now on.
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
    pub async fn flush(&mut self) -> Result<()> {
        self.core.check()?;

        if self.core.buffered() > 0 {
            if let Err(e) = self.writer.write_all(self.core.pending()).await {
                return Err(self.core.latch(e));
            }
            self.core.clear();
        }

        if let Err(e) = self.writer.flush().await {
            return Err(self.core.latch(e));
        }
        Ok(())
    }

    /// Write `data`, flushing as needed.
    ///
    /// # Returns
    ///
    /// The number of bytes accepted, which is always `data.len()`.
    pub async fn write(&mut self, mut data: &[u8]) -> Result<usize> {
        self.core.check()?;

        if data.is_empty() {
            return Ok(0);
        }

        let mut total = 0;
        while data.len() > self.core.available() {
            let written = if self.core.buffered() == 0 {
                trace!(len = data.len(), "writing directly to sink");
                match self.writer.write(data).await {
                    Ok(0) => {
                        return Err(self.core.latch(io::Error::from(io::ErrorKind::WriteZero)));
                    }
                    Ok(n) => n,
                    Err(e) => return Err(self.core.latch(e)),
                }
            } else {
                let n = self.core.stage(data);
                self.flush().await?;
                n
            };
            total += written;
            data = &data[written..];
        }

        total += self.core.stage(data);
        Ok(total)
    }

    /// Flush buffered data, then shut the sink down.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.flush().await?;
        self.writer
            .shutdown()
            .await
            .map_err(|e| self.core.latch(e))
    }
}

/// Convenience: write all of `data` and flush in one call.
pub async fn write_and_flush<W>(writer: &mut AsyncBufWriter<W>, data: &[u8]) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let n = writer.write(data).await?;
    writer.flush().await?;
    Ok(n)
}
