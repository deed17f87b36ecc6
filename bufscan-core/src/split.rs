//! Delimiter-based stream splitting.
//!
//! [`split`] turns a [`ByteSource`] into a lazy iterator of the chunks found
//! between occurrences of a multi-byte delimiter. Matching uses a KMP failure
//! table, so no input byte is examined twice no matter how the source
//! fragments the stream, including fragments that cut a delimiter in half.
//!
//! After each match the scan restarts from zero on the remaining bytes; a
//! delimiter is never allowed to overlap the one before it.
//!
//! # Example
//!
//! ```
//! use bufscan_core::split::{split, split_lines};
//!
//! let chunks: Vec<Vec<u8>> = split(&b"A::B::C"[..], b"::")
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(chunks, vec![b"A".to_vec(), b"B".to_vec(), b"C".to_vec()]);
//!
//! let lines: Vec<String> = split_lines(&b"one\r\ntwo"[..])
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(lines, vec!["one", "two"]);
//! ```

use crate::bytes;
use crate::config::{BufConfig, sizes};
use crate::error::{BufError, Result};
use crate::source::{ByteSource, checked_count};
use tracing::warn;

/// Iterator over delimiter-separated chunks of a [`ByteSource`].
///
/// Created by [`split`]. Each item is an owned chunk without the delimiter.
/// When the source ends, whatever is left is yielded as the final chunk,
/// even if it is empty. A source error is yielded once and ends iteration.
#[derive(Debug)]
pub struct Split<S> {
    source: S,
    delim: Vec<u8>,
    /// KMP failure table for `delim`.
    lps: Vec<usize>,
    /// Bytes read but not yet emitted.
    pending: Vec<u8>,
    /// Next byte of `pending` to examine.
    inspect: usize,
    /// Number of delimiter bytes matched so far.
    matched: usize,
    /// Per-read scratch buffer.
    scratch: Vec<u8>,
    max_empty_reads: usize,
    done: bool,
}

/// Split `source` into chunks separated by `delim`.
///
/// # Errors
///
/// [`BufError::InvalidArgument`] if `delim` is empty.
pub fn split<S: ByteSource>(source: S, delim: &[u8]) -> Result<Split<S>> {
    split_with_config(source, delim, BufConfig::new(sizes::MIN_SPLIT_READ))
}

/// Like [`split`], with the per-read size and empty-read limit taken from
/// `config`.
///
/// The read size is never below [`MIN_SPLIT_READ`](sizes::MIN_SPLIT_READ)
/// or `delim.len() + 1`.
pub fn split_with_config<S: ByteSource>(
    source: S,
    delim: &[u8],
    config: BufConfig,
) -> Result<Split<S>> {
    if delim.is_empty() {
        return Err(BufError::invalid_argument("delimiter must not be empty"));
    }
    let scratch_len = config
        .capacity
        .max(sizes::MIN_SPLIT_READ)
        .max(delim.len() + 1);
    Ok(Split {
        source,
        delim: delim.to_vec(),
        lps: bytes::create_lps(delim),
        pending: Vec::new(),
        inspect: 0,
        matched: 0,
        scratch: vec![0u8; scratch_len],
        max_empty_reads: config.max_empty_reads.max(1),
        done: false,
    })
}

impl<S> Split<S> {
    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Consume the iterator and return the underlying source.
    ///
    /// Bytes read but not yet emitted are lost.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Continue scanning `pending` and cut off the next chunk if a full
    /// delimiter is found.
    fn scan(&mut self) -> Option<Vec<u8>> {
        while self.inspect < self.pending.len() {
            if self.pending[self.inspect] == self.delim[self.matched] {
                self.inspect += 1;
                self.matched += 1;
                if self.matched == self.delim.len() {
                    let match_end = self.inspect - self.delim.len();
                    let rest = self.pending.split_off(self.inspect);
                    let mut chunk = std::mem::replace(&mut self.pending, rest);
                    chunk.truncate(match_end);
                    self.inspect = 0;
                    self.matched = 0;
                    return Some(chunk);
                }
            } else if self.matched == 0 {
                self.inspect += 1;
            } else {
                self.matched = self.lps[self.matched - 1];
            }
        }
        None
    }
}

impl<S: ByteSource> Iterator for Split<S> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut empty_reads = 0;
        loop {
            if let Some(chunk) = self.scan() {
                return Some(Ok(chunk));
            }

            match self.source.read_into(&mut self.scratch) {
                Ok(None) => {
                    self.done = true;
                    return Some(Ok(std::mem::take(&mut self.pending)));
                }
                Ok(Some(0)) => {
                    empty_reads += 1;
                    if empty_reads >= self.max_empty_reads {
                        warn!(attempts = empty_reads, "splitter source made no progress");
                        self.done = true;
                        return Some(Err(BufError::no_progress(empty_reads)));
                    }
                }
                Ok(Some(n)) => {
                    empty_reads = 0;
                    let n = match checked_count(n, self.scratch.len()) {
                        Ok(n) => n,
                        Err(e) => {
                            self.done = true;
                            return Some(Err(e));
                        }
                    };
                    self.pending.extend_from_slice(&self.scratch[..n]);
                }
                Err(e) => {
                    self.done = true;
                    let partial = std::mem::take(&mut self.pending);
                    return Some(Err(BufError::io_with_partial(e, partial)));
                }
            }
        }
    }
}

impl<S: ByteSource> std::iter::FusedIterator for Split<S> {}

/// Split `source` on `delim` and decode each chunk as UTF-8 text.
///
/// Malformed sequences are replaced with U+FFFD.
///
/// # Errors
///
/// [`BufError::InvalidArgument`] if `delim` is empty.
pub fn split_str<S: ByteSource>(
    source: S,
    delim: &str,
) -> Result<impl Iterator<Item = Result<String>>> {
    Ok(split(source, delim.as_bytes())?.map(|chunk| chunk.map(|c| bytes::decode_utf8(&c))))
}

/// Split `source` into lines.
///
/// Lines are separated by `\n`; a single `\r` before it is dropped too.
pub fn split_lines<S: ByteSource>(source: S) -> impl Iterator<Item = Result<String>> {
    let lines = split(source, b"\n").map(|chunks| {
        chunks.map(|chunk| {
            chunk.map(|mut line| {
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                bytes::decode_utf8(&line)
            })
        })
    });
    // `split` only fails on an empty delimiter.
    lines.into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    /// Delivers one scripted fragment per read.
    struct Fragments(VecDeque<Vec<u8>>);

    impl Fragments {
        fn new(parts: &[&[u8]]) -> Self {
            Self(parts.iter().map(|p| p.to_vec()).collect())
        }
    }

    impl ByteSource for Fragments {
        fn read_into(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
            let Some(mut part) = self.0.pop_front() else {
                return Ok(None);
            };
            let n = bytes::copy(&part, buf, 0);
            if n < part.len() {
                self.0.push_front(part.split_off(n));
            }
            Ok(Some(n))
        }
    }

    fn collect<S: ByteSource>(source: S, delim: &[u8]) -> Vec<Vec<u8>> {
        split(source, delim)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_split_basic() {
        let chunks = collect(&b"A::B::C"[..], b"::");
        assert_eq!(chunks, vec![b"A".to_vec(), b"B".to_vec(), b"C".to_vec()]);
    }

    #[test]
    fn test_split_delimiter_across_fragments() {
        let source = Fragments::new(&[&b"A:"[..], &b":B:"[..], &b""[..], &b":C"[..]]);
        let chunks = collect(source, b"::");
        assert_eq!(chunks, vec![b"A".to_vec(), b"B".to_vec(), b"C".to_vec()]);
    }

    #[test]
    fn test_split_one_byte_fragments() {
        let data = b"foo<|>bar<|><|>baz";
        let parts: Vec<&[u8]> = data.chunks(1).collect();
        let chunks = collect(Fragments::new(&parts), b"<|>");
        assert_eq!(
            chunks,
            vec![b"foo".to_vec(), b"bar".to_vec(), Vec::new(), b"baz".to_vec()]
        );
    }

    #[test]
    fn test_split_trailing_delimiter_yields_empty_chunk() {
        let chunks = collect(&b"a\nb\n"[..], b"\n");
        assert_eq!(chunks, vec![b"a".to_vec(), b"b".to_vec(), Vec::new()]);
    }

    #[test]
    fn test_split_empty_source() {
        let chunks = collect(&b""[..], b"::");
        assert_eq!(chunks, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_split_partial_match_fallback() {
        // "aab" needs the failure table after the "aa" prefix mismatches.
        let chunks = collect(&b"xaaabyaabz"[..], b"aab");
        assert_eq!(chunks, vec![b"xa".to_vec(), b"y".to_vec(), b"z".to_vec()]);
    }

    #[test]
    fn test_split_restarts_after_match() {
        // Matches never overlap: "aaa" on "aa" gives one match then "a".
        let chunks = collect(&b"aaa"[..], b"aa");
        assert_eq!(chunks, vec![Vec::new(), b"a".to_vec()]);
    }

    #[test]
    fn test_split_empty_delimiter() {
        let err = split(&b"abc"[..], b"").unwrap_err();
        assert!(matches!(err, BufError::InvalidArgument { .. }));
    }

    struct FailAfter(Option<Vec<u8>>);

    impl ByteSource for FailAfter {
        fn read_into(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
            match self.0.take() {
                Some(data) => Ok(Some(bytes::copy(&data, buf, 0))),
                None => Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
            }
        }
    }

    #[test]
    fn test_split_source_error_ends_iteration() {
        let mut chunks = split(FailAfter(Some(b"a,b".to_vec())), b",").unwrap();
        assert_eq!(chunks.next().unwrap().unwrap(), b"a");

        let err = chunks.next().unwrap().unwrap_err();
        assert!(matches!(err, BufError::Io { .. }));
        assert_eq!(err.partial(), b"b");
        assert!(chunks.next().is_none());
    }

    struct Stuck;

    impl ByteSource for Stuck {
        fn read_into(&mut self, _buf: &mut [u8]) -> io::Result<Option<usize>> {
            Ok(Some(0))
        }
    }

    #[test]
    fn test_split_no_progress() {
        let mut chunks = split(Stuck, b",").unwrap();
        let err = chunks.next().unwrap().unwrap_err();
        assert!(matches!(err, BufError::NoProgress { .. }));
        assert!(chunks.next().is_none());
    }

    #[test]
    fn test_split_with_config_limits() {
        let config = BufConfig::new(0).with_max_empty_reads(3);
        let chunks = split_with_config(Stuck, b",", config).unwrap();
        assert_eq!(chunks.scratch.len(), sizes::MIN_SPLIT_READ);

        let mut chunks = chunks;
        let err = chunks.next().unwrap().unwrap_err();
        assert!(matches!(err, BufError::NoProgress { attempts: 3 }));

        let long = vec![b'-'; 2000];
        let chunks = split_with_config(&b""[..], &long, BufConfig::SMALL).unwrap();
        assert_eq!(chunks.scratch.len(), 2001);
    }

    struct Overreports;

    impl ByteSource for Overreports {
        fn read_into(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
            Ok(Some(buf.len() + 1))
        }
    }

    #[test]
    fn test_split_rejects_overreporting_source() {
        let mut chunks = split(Overreports, b",").unwrap();
        let err = chunks.next().unwrap().unwrap_err();
        assert!(matches!(err, BufError::InvalidArgument { .. }));
        assert!(chunks.next().is_none());
    }

    #[test]
    fn test_split_str() {
        let words: Vec<String> = split_str(&b"alpha, beta, \xFFgamma"[..], ", ")
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(words, vec!["alpha", "beta", "\u{FFFD}gamma"]);
    }

    #[test]
    fn test_split_lines() {
        let lines: Vec<String> = split_lines(&b"one\r\ntwo\n\r\nthree\r"[..])
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }
}
