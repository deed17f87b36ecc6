//! Error types for bufscan operations.
//!
//! Every fallible operation in this crate returns [`BufError`]. Errors that
//! happen part-way through a read carry the bytes gathered so far as a
//! `partial` payload, so callers can recover what was already consumed from
//! the source.
//!
//! `BufError` is `Clone`: a [`BufWriter`](crate::BufWriter) that hits a sink
//! failure keeps the error and hands out copies of it on every later call.

use std::io;
use std::sync::Arc;
use thiserror::Error;

/// The main error type for bufscan operations.
#[derive(Debug, Clone, Error)]
pub enum BufError {
    /// I/O error from the underlying source or sink.
    #[error("I/O error: {source}")]
    Io {
        /// The error reported by the source or sink.
        source: Arc<io::Error>,
        /// Bytes read before the failure, if any.
        partial: Vec<u8>,
    },

    /// The internal buffer filled up before the request could be satisfied.
    #[error("Buffer full: {} bytes buffered without completing the request", .partial.len())]
    BufferFull {
        /// Contents of the buffer at the time of failure.
        partial: Vec<u8>,
    },

    /// End of stream was reached after some, but not all, bytes were read.
    #[error("Partial read: stream ended after {} bytes", .partial.len())]
    PartialRead {
        /// Bytes read before end of stream.
        partial: Vec<u8>,
    },

    /// The source kept returning zero bytes without signalling end of stream.
    #[error("No progress after {attempts} consecutive empty reads")]
    NoProgress {
        /// Number of read attempts made.
        attempts: usize,
    },

    /// A fill was requested while the buffer had no free space.
    ///
    /// Public reader operations never fill a full buffer, so this signals a
    /// broken internal invariant rather than a condition callers handle.
    #[error("Tried to fill a full buffer")]
    FillFull,

    /// An argument was outside the accepted domain.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// A size computation overflowed.
    #[error("Size overflow: {len} bytes repeated {count} times")]
    Overflow {
        /// Length of the repeated slice.
        len: usize,
        /// Requested repeat count.
        count: usize,
    },
}

/// Result type alias for bufscan operations.
pub type Result<T> = std::result::Result<T, BufError>;

impl BufError {
    /// Create an I/O error carrying the bytes read so far.
    pub fn io_with_partial(err: io::Error, partial: impl Into<Vec<u8>>) -> Self {
        Self::Io {
            source: Arc::new(err),
            partial: partial.into(),
        }
    }

    /// Create a buffer full error.
    pub fn buffer_full(partial: impl Into<Vec<u8>>) -> Self {
        Self::BufferFull {
            partial: partial.into(),
        }
    }

    /// Create a partial read error.
    pub fn partial_read(partial: impl Into<Vec<u8>>) -> Self {
        Self::PartialRead {
            partial: partial.into(),
        }
    }

    /// Create a no progress error.
    pub fn no_progress(attempts: usize) -> Self {
        Self::NoProgress { attempts }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an overflow error.
    pub fn overflow(len: usize, count: usize) -> Self {
        Self::Overflow { len, count }
    }

    /// Bytes that were read before the error occurred.
    ///
    /// Empty for errors that do not carry a payload.
    pub fn partial(&self) -> &[u8] {
        match self {
            Self::Io { partial, .. }
            | Self::BufferFull { partial }
            | Self::PartialRead { partial } => partial,
            _ => &[],
        }
    }

    /// Replace the partial payload, keeping the error kind.
    ///
    /// Errors without a payload are returned unchanged.
    pub(crate) fn with_partial(self, bytes: &[u8]) -> Self {
        match self {
            Self::Io { source, .. } => Self::Io {
                source,
                partial: bytes.to_vec(),
            },
            Self::PartialRead { .. } => Self::partial_read(bytes),
            other => other,
        }
    }
}

impl From<io::Error> for BufError {
    fn from(err: io::Error) -> Self {
        Self::io_with_partial(err, Vec::new())
    }
}

impl From<BufError> for io::Error {
    fn from(err: BufError) -> Self {
        match err {
            BufError::Io { source, .. } => match Arc::try_unwrap(source) {
                Ok(inner) => inner,
                Err(shared) => io::Error::new(shared.kind(), shared.to_string()),
            },
            BufError::PartialRead { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            BufError::InvalidArgument { .. } | BufError::Overflow { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            other => io::Error::other(other),
        }
    }
}
