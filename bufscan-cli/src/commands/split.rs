//! Split command implementation.

use crate::utils::{escape_bytes, open_input, parse_delimiter};
use bufscan_core::{BufConfig, IoSource, bytes, split_with_config};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// JSON serializable chunk.
#[derive(Debug, Serialize)]
struct ChunkJson {
    index: usize,
    len: usize,
    text: String,
}

/// JSON output for a split run.
#[derive(Debug, Serialize)]
struct SplitJson {
    source: String,
    delimiter: String,
    count: usize,
    chunks: Vec<ChunkJson>,
}

/// Options for splitting a stream.
pub struct SplitOptions<'a> {
    pub delimiter: &'a str,
    pub file: Option<&'a Path>,
    pub json: bool,
    pub buffer_size: usize,
}

pub fn cmd_split(options: &SplitOptions) -> Result<(), Box<dyn std::error::Error>> {
    let delim = parse_delimiter(options.delimiter)?;
    let input = open_input(options.file)?;
    let config = BufConfig::new(options.buffer_size);
    let chunks = split_with_config(IoSource::new(input), &delim, config)?;

    debug!(delimiter = %escape_bytes(&delim), "splitting input");

    if options.json {
        let mut out = Vec::new();
        for (index, chunk) in chunks.enumerate() {
            let chunk = chunk?;
            out.push(ChunkJson {
                index,
                len: chunk.len(),
                text: bytes::decode_utf8(&chunk),
            });
        }
        let report = SplitJson {
            source: source_name(options.file),
            delimiter: escape_bytes(&delim),
            count: out.len(),
            chunks: out,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    for chunk in chunks {
        stdout.write_all(&chunk?)?;
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

pub(crate) fn source_name(file: Option<&Path>) -> String {
    match file {
        Some(p) => p.display().to_string(),
        None => "-".to_string(),
    }
}
