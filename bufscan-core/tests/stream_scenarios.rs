//! End-to-end scenarios for the reader, writer and splitter.

use bufscan_core::{BufError, BufReader, BufWriter, ByteSource, IoSource, split, split_lines};
use std::collections::VecDeque;
use std::io::{self, Cursor};

/// Source replaying a fixed list of fragments.
struct Script(VecDeque<Vec<u8>>);

impl Script {
    fn new(parts: &[&str]) -> Self {
        Self(parts.iter().map(|p| p.as_bytes().to_vec()).collect())
    }
}

impl ByteSource for Script {
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        let Some(mut part) = self.0.pop_front() else {
            return Ok(None);
        };
        let n = part.len().min(buf.len());
        buf[..n].copy_from_slice(&part[..n]);
        if n < part.len() {
            self.0.push_front(part.split_off(n));
        }
        Ok(Some(n))
    }
}

#[test]
fn test_read_line_crlf_and_lf() {
    let mut reader = BufReader::new(&b"abc\r\ndef\n"[..]);

    let first = reader.read_line().unwrap().unwrap();
    assert_eq!(&*first.line, b"abc");
    assert!(!first.more);

    let second = reader.read_line().unwrap().unwrap();
    assert_eq!(&*second.line, b"def");
    assert!(!second.more);

    assert!(reader.read_line().unwrap().is_none());
}

#[test]
fn test_read_slice_buffer_full_payload() {
    let source = Script::new(&["aaaaaaaa", "aaaaaaaa", "aaaaaaaa\n"]);
    let mut reader = BufReader::with_capacity(16, source);

    let err = reader.read_slice(b'\n').unwrap_err();
    match &err {
        BufError::BufferFull { partial } => assert_eq!(partial.len(), reader.size()),
        other => panic!("expected BufferFull, got {other:?}"),
    }

    // The rest of the line is still readable afterwards.
    assert_eq!(reader.read_slice(b'\n').unwrap(), Some(&b"aaaaaaaa\n"[..]));
    assert_eq!(err.partial(), &[b'a'; 16][..]);
}

#[test]
fn test_read_line_crlf_across_buffer_boundary() {
    // The '\r' is the last byte that fits in the 16 byte buffer.
    let source = Script::new(&["0123456789abcde\r", "\nnext\n"]);
    let mut reader = BufReader::with_capacity(16, source);

    let head = reader.read_line().unwrap().unwrap().into_owned();
    assert_eq!(&*head.line, b"0123456789abcde");
    assert!(head.more);

    let tail = reader.read_line().unwrap().unwrap().into_owned();
    assert_eq!(&*tail.line, b"");
    assert!(!tail.more);

    let next = reader.read_line().unwrap().unwrap().into_owned();
    assert_eq!(&*next.line, b"next");
}

#[test]
fn test_read_full_partial() {
    let mut reader = BufReader::new(&b"abc"[..]);
    let mut dest = [0u8; 5];
    let err = reader.read_full(&mut dest).unwrap_err();
    assert!(matches!(err, BufError::PartialRead { .. }));
    assert_eq!(err.partial(), b"abc");

    let io_err: io::Error = err.into();
    assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);
}

#[test]
fn test_reader_over_std_read() {
    let cursor = Cursor::new(b"key=value\nother=thing\n".to_vec());
    let mut reader = BufReader::new(IoSource::new(cursor));

    assert_eq!(
        reader.read_string("=").unwrap().as_deref(),
        Some("key=")
    );
    assert_eq!(
        reader.read_string("\n").unwrap().as_deref(),
        Some("value\n")
    );
    assert_eq!(reader.peek(5).unwrap(), Some(&b"other"[..]));
    assert!(matches!(
        reader.read_string("=="),
        Err(BufError::InvalidArgument { .. })
    ));
}

#[test]
fn test_split_a_b_c_any_fragmentation() {
    let data = "A::B::C";
    let expected = vec![b"A".to_vec(), b"B".to_vec(), b"C".to_vec()];

    // Every way of cutting the input in two, plus one byte at a time.
    let mut scripts: Vec<Script> = (0..=data.len())
        .map(|cut| Script::new(&[&data[..cut], &data[cut..]]))
        .collect();
    let singles: Vec<String> = data.chars().map(String::from).collect();
    let singles: Vec<&str> = singles.iter().map(String::as_str).collect();
    scripts.push(Script::new(&singles));

    for script in scripts {
        let chunks: Vec<Vec<u8>> = split(script, b"::")
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(chunks, expected);
    }
}

#[test]
fn test_split_lines_over_file_like_source() {
    let cursor = Cursor::new(b"GET / HTTP/1.1\r\nHost: example\r\n\r\n".to_vec());
    let lines: Vec<String> = split_lines(IoSource::new(cursor))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(lines, vec!["GET / HTTP/1.1", "Host: example", "", ""]);
}

#[test]
fn test_reader_to_writer_copy() {
    let input: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let mut reader = BufReader::with_capacity(100, &input[..]);
    let mut writer = BufWriter::with_capacity(64, Vec::new());

    let mut buf = [0u8; 37];
    while let Some(n) = reader.read(&mut buf).unwrap() {
        writer.write(&buf[..n]).unwrap();
    }
    writer.flush().unwrap();
    assert_eq!(writer.into_inner(), input);
}
