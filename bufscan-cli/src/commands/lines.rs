//! Lines command implementation.

use super::split::source_name;
use crate::utils::open_input;
use bufscan_core::{BufReader, IoSource, bytes};
use serde::Serialize;
use std::path::Path;

/// JSON serializable line.
#[derive(Debug, Serialize)]
struct LineJson {
    number: usize,
    text: String,
    /// Number of buffer-sized pieces the line arrived in.
    fragments: usize,
}

/// JSON output for a line listing.
#[derive(Debug, Serialize)]
struct LinesJson {
    source: String,
    count: usize,
    lines: Vec<LineJson>,
}

/// Options for listing lines.
pub struct LinesOptions<'a> {
    pub file: Option<&'a Path>,
    pub json: bool,
    pub buffer_size: usize,
}

pub fn cmd_lines(options: &LinesOptions) -> Result<(), Box<dyn std::error::Error>> {
    let input = open_input(options.file)?;
    let mut reader = BufReader::with_capacity(options.buffer_size, IoSource::new(input));

    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut fragments = 0;
    while let Some(line) = reader.read_line()? {
        current.extend_from_slice(&line.line);
        fragments += 1;
        if line.more {
            continue;
        }

        let text = bytes::decode_utf8(&current);
        if options.json {
            lines.push(LineJson {
                number: lines.len() + 1,
                text,
                fragments,
            });
        } else {
            println!("{}", text);
        }
        current.clear();
        fragments = 0;
    }

    if options.json {
        let report = LinesJson {
            source: source_name(options.file),
            count: lines.len(),
            lines,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
