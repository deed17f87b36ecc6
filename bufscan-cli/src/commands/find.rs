//! Find command implementation.

use crate::utils::{escape_bytes, open_input, parse_delimiter};
use bufscan_core::{BufConfig, BufReader, IoSource, bytes};
use std::path::Path;

pub fn cmd_find(
    pattern: &str,
    file: Option<&Path>,
    last: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pattern = parse_delimiter(pattern)?;
    let input = open_input(file)?;
    let mut reader = BufReader::with_config(BufConfig::LARGE, IoSource::new(input));

    let mut data = Vec::new();
    let mut buf = vec![0u8; BufConfig::LARGE.capacity];
    while let Some(n) = reader.read(&mut buf)? {
        data.extend_from_slice(&buf[..n]);
    }

    let offsets: Vec<usize> = if last {
        bytes::last_index_of(&data, &pattern).into_iter().collect()
    } else {
        let mut found = Vec::new();
        let mut from = 0;
        while let Some(i) = bytes::index_of_from(&data, &pattern, from) {
            found.push(i);
            from = i + 1;
        }
        found
    };

    if offsets.is_empty() {
        return Err(format!("pattern '{}' not found", escape_bytes(&pattern)).into());
    }
    for offset in offsets {
        println!("{}", offset);
    }
    Ok(())
}
