//! Utility functions for the CLI.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the global log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `warn`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "bufscan_core=debug,bufscan=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Open `path` for reading, or stdin when it is `None` or `-`.
pub fn open_input(path: Option<&Path>) -> io::Result<Box<dyn Read>> {
    match path {
        Some(p) if p != Path::new("-") => Ok(Box::new(File::open(p)?)),
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Create `path` for writing, or stdout when it is `None` or `-`.
pub fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(p) if p != Path::new("-") => Ok(Box::new(File::create(p)?)),
        _ => Ok(Box::new(io::stdout().lock())),
    }
}

/// Turn a command-line delimiter into bytes.
///
/// Understands `\n`, `\r`, `\t`, `\0`, `\\` and `\xNN`.
pub fn parse_delimiter(text: &str) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(text.len());
    let mut rest = text.as_bytes();

    while let Some((&b, tail)) = rest.split_first() {
        rest = tail;
        if b != b'\\' {
            out.push(b);
            continue;
        }
        let Some((&esc, tail)) = rest.split_first() else {
            return Err("dangling '\\' at end of delimiter".to_string());
        };
        rest = tail;
        match esc {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'0' => out.push(0),
            b'\\' => out.push(b'\\'),
            b'x' => {
                let hex = rest
                    .get(..2)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| "expected two hex digits after '\\x'".to_string())?;
                out.push(hex);
                rest = &rest[2..];
            }
            other => return Err(format!("unknown escape '\\{}'", other as char)),
        }
    }

    if out.is_empty() {
        return Err("delimiter must not be empty".to_string());
    }
    Ok(out)
}

/// Render bytes for display, escaping anything that is not printable ASCII.
pub fn escape_bytes(data: &[u8]) -> String {
    data.escape_ascii().to_string()
}
