//! The byte source abstraction consumed by readers and the splitter.
//!
//! [`std::io::Read`] folds "no data yet" and "no data ever again" into the
//! same `Ok(0)`. Buffered scanning needs to tell them apart, so sources
//! implement [`ByteSource`] instead, which reports end of stream explicitly.
//! Use [`IoSource`] to adapt any `Read`.

use std::io::{self, Read};

/// A source of bytes.
pub trait ByteSource {
    /// Attempt to read bytes into `buf`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(n))`: `n` bytes were written to the front of `buf`. `n` may
    ///   be zero, meaning "nothing right now, try again".
    /// - `Ok(None)`: end of stream. No more bytes will ever be produced.
    ///
    /// A source must eventually either deliver bytes or report end of stream;
    /// readers give up on sources that return zero indefinitely.
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        (**self).read_into(buf)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    #[inline]
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        (**self).read_into(buf)
    }
}

/// Validate a count reported by [`ByteSource::read_into`] against the space
/// it was given.
pub(crate) fn checked_count(n: usize, space: usize) -> crate::error::Result<usize> {
    if n > space {
        return Err(crate::error::BufError::invalid_argument(format!(
            "source reported {n} bytes read into a {space} byte buffer"
        )));
    }
    Ok(n)
}

/// Reading from a byte slice consumes it from the front.
impl ByteSource for &[u8] {
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        if self.is_empty() {
            return Ok(None);
        }
        let n = crate::bytes::copy(self, buf, 0);
        let (_, rest) = self.split_at(n);
        *self = rest;
        Ok(Some(n))
    }
}

/// Adapter turning any [`std::io::Read`] into a [`ByteSource`].
///
/// `Ok(0)` from a non-empty read becomes end of stream, and
/// [`io::ErrorKind::Interrupted`] becomes an empty read so the caller retries.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    /// Wrap a reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Get a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the adapter and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        if buf.is_empty() {
            return Ok(Some(0));
        }
        match self.inner.read(buf) {
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some(n)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(Some(0)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_slice_source() {
        let mut source: &[u8] = b"hello";
        let mut buf = [0u8; 3];
        assert_eq!(source.read_into(&mut buf).unwrap(), Some(3));
        assert_eq!(&buf, b"hel");
        assert_eq!(source.read_into(&mut buf).unwrap(), Some(2));
        assert_eq!(&buf[..2], b"lo");
        assert_eq!(source.read_into(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_io_source_eof() {
        let mut source = IoSource::new(Cursor::new(vec![1u8, 2, 3]));
        let mut buf = [0u8; 8];
        assert_eq!(source.read_into(&mut buf).unwrap(), Some(3));
        assert_eq!(source.read_into(&mut buf).unwrap(), None);
        assert_eq!(source.read_into(&mut []).unwrap(), Some(0));
    }

    struct Interrupting {
        interrupted: bool,
    }

    impl Read for Interrupting {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            buf[0] = b'x';
            Ok(1)
        }
    }

    #[test]
    fn test_io_source_interrupted() {
        let mut source = IoSource::new(Interrupting { interrupted: false });
        let mut buf = [0u8; 4];
        assert_eq!(source.read_into(&mut buf).unwrap(), Some(0));
        assert_eq!(source.read_into(&mut buf).unwrap(), Some(1));
        assert_eq!(buf[0], b'x');
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn ByteSource> = Box::new(&b"ab"[..]);
        let mut buf = [0u8; 4];
        assert_eq!(source.read_into(&mut buf).unwrap(), Some(2));
        assert_eq!(source.read_into(&mut buf).unwrap(), None);
    }
}
