//! Byte slice primitives.
//!
//! Pattern search, affix tests, bounded copy, repetition and concatenation
//! over plain `&[u8]`. Everything here is pure: no state, no I/O.
//!
//! # Example
//!
//! ```
//! use bufscan_core::bytes;
//!
//! let haystack = b"key=value;key=other";
//! assert_eq!(bytes::index_of(haystack, b"key"), Some(0));
//! assert_eq!(bytes::index_of_from(haystack, b"key", 1), Some(10));
//! assert_eq!(bytes::last_index_of(haystack, b"key"), Some(10));
//!
//! let mut dst = [0u8; 4];
//! assert_eq!(bytes::copy(b"abcdef", &mut dst, 1), 3);
//! assert_eq!(&dst, b"\0abc");
//! ```

use crate::error::{BufError, Result};

/// Find the first occurrence of `pattern` in `source`.
///
/// Returns `None` if there is no occurrence or `pattern` is empty.
#[inline]
pub fn index_of(source: &[u8], pattern: &[u8]) -> Option<usize> {
    index_of_from(source, pattern, 0)
}

/// Find the first occurrence of `pattern` in `source` at or after `start`.
///
/// Returns `None` if `start` is past the end of `source`, if there is no
/// occurrence, or if `pattern` is empty.
pub fn index_of_from(source: &[u8], pattern: &[u8], start: usize) -> Option<usize> {
    let &first = pattern.first()?;
    if start >= source.len() {
        return None;
    }

    for i in start..source.len() {
        if source[i] != first {
            continue;
        }
        // Anchored on the first byte, verify the rest linearly.
        let rest = &source[i + 1..];
        let tail = &pattern[1..];
        if rest.len() >= tail.len() && rest.iter().zip(tail).all(|(a, b)| a == b) {
            return Some(i);
        }
    }
    None
}

/// Find the last occurrence of `pattern` in `source`.
///
/// Returns the start index of the occurrence, or `None`.
#[inline]
pub fn last_index_of(source: &[u8], pattern: &[u8]) -> Option<usize> {
    let end = source.len().checked_sub(1)?;
    last_index_of_from(source, pattern, end)
}

/// Find the last occurrence of `pattern` that ends at or before `start`.
///
/// `start` is clamped to the last index of `source`. The scan runs backwards
/// anchored on the final byte of `pattern`; the returned value is the index
/// where the occurrence begins.
pub fn last_index_of_from(source: &[u8], pattern: &[u8], start: usize) -> Option<usize> {
    let &last = pattern.last()?;
    let start = start.min(source.len().checked_sub(1)?);

    for i in (0..=start).rev() {
        if source[i] != last {
            continue;
        }
        let Some(begin) = (i + 1).checked_sub(pattern.len()) else {
            continue;
        };
        if source[begin..i] == pattern[..pattern.len() - 1] {
            return Some(begin);
        }
    }
    None
}

/// Check whether two byte slices are equal.
#[inline]
pub fn equals(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Check whether `source` begins with `prefix`.
pub fn starts_with(source: &[u8], prefix: &[u8]) -> bool {
    if source.len() < prefix.len() {
        return false;
    }
    equals(&source[..prefix.len()], prefix)
}

/// Check whether `source` ends with `suffix`.
pub fn ends_with(source: &[u8], suffix: &[u8]) -> bool {
    let Some(offset) = source.len().checked_sub(suffix.len()) else {
        return false;
    };
    equals(&source[offset..], suffix)
}

/// Check whether `pattern` occurs anywhere in `source`.
#[inline]
pub fn contains(source: &[u8], pattern: &[u8]) -> bool {
    index_of(source, pattern).is_some()
}

/// Copy `src` into `dst` starting at `offset`.
///
/// `offset` is clamped to `dst.len()`. At most `dst.len() - offset` bytes are
/// copied; anything beyond that is silently dropped.
///
/// # Returns
///
/// The number of bytes copied.
#[inline]
pub fn copy(src: &[u8], dst: &mut [u8], offset: usize) -> usize {
    let offset = offset.min(dst.len());
    let n = src.len().min(dst.len() - offset);
    dst[offset..offset + n].copy_from_slice(&src[..n]);
    n
}

/// Build a new buffer holding `count` copies of `origin`.
///
/// `count == 0` always yields an empty buffer.
///
/// # Errors
///
/// Returns [`BufError::Overflow`] if the total length does not fit in `usize`.
pub fn repeat(origin: &[u8], count: usize) -> Result<Vec<u8>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let total = origin
        .len()
        .checked_mul(count)
        .ok_or_else(|| BufError::overflow(origin.len(), count))?;

    let mut out = vec![0u8; total];
    let mut filled = copy(origin, &mut out, 0);
    // Double the filled prefix until the buffer is full.
    while filled < total {
        let (head, tail) = out.split_at_mut(filled);
        filled += copy(head, tail, 0);
    }
    Ok(out)
}

/// Concatenate the given slices into a new buffer.
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let total = parts.iter().map(|p| p.len()).sum();
    let mut out = vec![0u8; total];
    let mut index = 0;
    for part in parts {
        index += copy(part, &mut out, index);
    }
    out
}

/// Decode bytes as UTF-8 text.
///
/// A leading byte order mark is removed and malformed sequences are replaced
/// with U+FFFD, following the WHATWG decoder used by browsers.
pub fn decode_utf8(bytes: &[u8]) -> String {
    let (text, _had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    text.into_owned()
}

/// Build the KMP failure table for `pattern`.
///
/// Entry `i` is the length of the longest proper prefix of `pattern` that is
/// also a suffix of `pattern[..=i]`.
pub fn create_lps(pattern: &[u8]) -> Vec<usize> {
    let mut lps = vec![0usize; pattern.len()];
    let mut len = 0;
    let mut i = 1;
    while i < pattern.len() {
        if pattern[i] == pattern[len] {
            len += 1;
            lps[i] = len;
            i += 1;
        } else if len != 0 {
            len = lps[len - 1];
        } else {
            lps[i] = 0;
            i += 1;
        }
    }
    lps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_of() {
        assert_eq!(index_of(b"abcabc", b"bc"), Some(1));
        assert_eq!(index_of(b"abcabc", b"abd"), None);
        assert_eq!(index_of(b"aab", b"ab"), Some(1));
        assert_eq!(index_of(b"abc", b"abcd"), None);
        assert_eq!(index_of(b"", b"a"), None);
    }

    #[test]
    fn test_index_of_from() {
        assert_eq!(index_of_from(b"abcabc", b"abc", 1), Some(3));
        assert_eq!(index_of_from(b"abcabc", b"abc", 3), Some(3));
        assert_eq!(index_of_from(b"abcabc", b"abc", 4), None);
        assert_eq!(index_of_from(b"abc", b"a", 3), None);
        assert_eq!(index_of_from(b"abc", b"a", 100), None);
    }

    #[test]
    fn test_index_of_empty_pattern() {
        assert_eq!(index_of(b"abc", b""), None);
        assert_eq!(last_index_of(b"abc", b""), None);
    }

    #[test]
    fn test_last_index_of() {
        assert_eq!(last_index_of(b"abcabc", b"abc"), Some(3));
        assert_eq!(last_index_of(b"abcabc", b"x"), None);
        assert_eq!(last_index_of(b"", b"a"), None);
        assert_eq!(last_index_of(b"bc", b"abc"), None);
    }

    #[test]
    fn test_last_index_of_from() {
        // `start` bounds the end of the match.
        assert_eq!(last_index_of_from(b"abcabc", b"abc", 4), Some(0));
        assert_eq!(last_index_of_from(b"abcabc", b"abc", 5), Some(3));
        assert_eq!(last_index_of_from(b"abcabc", b"abc", 1), None);
        assert_eq!(last_index_of_from(b"abcabc", b"abc", 999), Some(3));
    }

    #[test]
    fn test_equals() {
        assert!(equals(b"abc", b"abc"));
        assert!(equals(b"", b""));
        assert!(!equals(b"abc", b"abd"));
        assert!(!equals(b"abc", b"ab"));
    }

    #[test]
    fn test_affixes() {
        assert!(starts_with(b"abcdef", b"abc"));
        assert!(!starts_with(b"abcdef", b"bcd"));
        assert!(starts_with(b"abc", b""));
        assert!(!starts_with(b"ab", b"abc"));

        assert!(ends_with(b"abcdef", b"def"));
        assert!(!ends_with(b"abcdef", b"cde"));
        assert!(ends_with(b"abc", b""));
        assert!(!ends_with(b"bc", b"abc"));
    }

    #[test]
    fn test_contains() {
        assert!(contains(b"hello world", b"o w"));
        assert!(!contains(b"hello world", b"ow"));
    }

    #[test]
    fn test_copy() {
        let mut dst = [0u8; 4];
        assert_eq!(copy(b"ab", &mut dst, 0), 2);
        assert_eq!(&dst, b"ab\0\0");

        let mut dst = [0u8; 4];
        assert_eq!(copy(b"abcdef", &mut dst, 2), 2);
        assert_eq!(&dst, b"\0\0ab");

        let mut dst = [7u8; 4];
        assert_eq!(copy(b"abc", &mut dst, 4), 0);
        assert_eq!(copy(b"abc", &mut dst, 10), 0);
        assert_eq!(&dst, &[7u8; 4]);
    }

    #[test]
    fn test_repeat() {
        assert_eq!(repeat(b"ab", 3).unwrap(), b"ababab");
        assert_eq!(repeat(b"x", 5).unwrap(), b"xxxxx");
        assert_eq!(repeat(b"abc", 0).unwrap(), b"");
        assert_eq!(repeat(b"", 10).unwrap(), b"");
        assert_eq!(repeat(b"abc", 7).unwrap(), b"abc".repeat(7));
    }

    #[test]
    fn test_repeat_overflow() {
        let err = repeat(b"ab", usize::MAX).unwrap_err();
        assert!(matches!(err, BufError::Overflow { len: 2, .. }));
    }

    #[test]
    fn test_concat() {
        assert_eq!(concat(&[&b"ab"[..], &b""[..], &b"cde"[..]]), b"abcde");
        assert_eq!(concat(&[]), b"");
        let ab = &b"ab"[..];
        assert_eq!(concat(&[ab, ab, ab]), repeat(ab, 3).unwrap());
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_utf8(b"hello"), "hello");
        assert_eq!(decode_utf8(b"\xEF\xBB\xBFbom"), "bom");
        assert_eq!(decode_utf8(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_create_lps() {
        assert_eq!(create_lps(b"::"), vec![0, 1]);
        assert_eq!(create_lps(b"abab"), vec![0, 0, 1, 2]);
        assert_eq!(create_lps(b"aabaaab"), vec![0, 1, 0, 1, 2, 2, 3]);
        assert_eq!(create_lps(b"\r\n"), vec![0, 0]);
        assert!(create_lps(b"").is_empty());
    }
}
