//! Copy command implementation.

use crate::utils::{open_input, open_output};
use bufscan_core::{BufConfig, BufReader, BufWriter, IoSource};
use std::path::Path;
use tracing::info;

pub fn cmd_copy(
    input: Option<&Path>,
    output: Option<&Path>,
    buffer_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = BufConfig::new(buffer_size);
    let mut reader = BufReader::with_config(config, IoSource::new(open_input(input)?));
    let mut writer = BufWriter::with_config(config, open_output(output)?);

    let mut buf = vec![0u8; config.writer_capacity()];
    let mut total = 0u64;
    while let Some(n) = reader.read(&mut buf)? {
        writer.write(&buf[..n])?;
        total += n as u64;
    }
    writer.flush()?;

    info!(bytes = total, buffer = reader.size(), "copy finished");
    Ok(())
}
