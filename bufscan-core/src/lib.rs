//! # BufScan Core
//!
//! Buffered byte stream I/O with delimiter scanning.
//!
//! This crate provides the building blocks for reading and writing byte
//! streams in bounded chunks:
//!
//! - [`bytes`]: Byte slice search, affix tests, copy, repeat and concat
//! - [`source`]: The [`ByteSource`] read abstraction and its adapters
//! - [`reader`]: [`BufReader`] with delimiter, line and peek operations
//! - [`writer`]: [`BufWriter`] over any [`std::io::Write`]
//! - [`split`]: Lazy multi-byte delimiter splitting (KMP)
//! - [`config`]: Buffer sizing and retry limits
//! - [`error`]: Error types
//!
//! With the `async-io` feature, [`async_io`] adds a Tokio-based writer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Stream Tools                                        │
//! │     Split iterator, line splitting, CLI                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Buffered I/O                                        │
//! │     BufReader, BufWriter, AsyncBufWriter                │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Primitives                                          │
//! │     ByteSource, byte search, KMP failure table          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bufscan_core::{BufReader, BufWriter};
//!
//! let mut reader = BufReader::with_capacity(16, &b"alpha\nbeta\n"[..]);
//! let mut writer = BufWriter::new(Vec::new());
//!
//! while let Some(line) = reader.read_line().unwrap() {
//!     writer.write(&line.line).unwrap();
//!     writer.write(b";").unwrap();
//! }
//! writer.flush().unwrap();
//! assert_eq!(writer.get_ref(), b"alpha;beta;");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "async-io")]
pub mod async_io;
pub mod bytes;
pub mod config;
pub mod error;
pub mod reader;
pub mod source;
pub mod split;
pub mod writer;

// Re-exports for convenience
#[cfg(feature = "async-io")]
pub use async_io::AsyncBufWriter;
pub use config::BufConfig;
pub use error::{BufError, Result};
pub use reader::{BufReader, ReadLine};
pub use source::{ByteSource, IoSource};
pub use split::{Split, split, split_lines, split_str, split_with_config};
pub use writer::BufWriter;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::BufConfig;
    pub use crate::error::{BufError, Result};
    pub use crate::reader::{BufReader, ReadLine};
    pub use crate::source::{ByteSource, IoSource};
    pub use crate::split::{Split, split};
    pub use crate::writer::BufWriter;
}
