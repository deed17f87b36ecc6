//! BufScan CLI - buffered stream tools
//!
//! Split, list, search and copy byte streams through the bufscan-core
//! buffered reader and writer.

mod commands;
mod utils;

use bufscan_core::config::sizes;
use clap::{Parser, Subcommand};
use commands::{LinesOptions, SplitOptions, cmd_copy, cmd_find, cmd_lines, cmd_split};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bufscan")]
#[command(author, version, about = "Buffered stream tools - split, lines, find, copy")]
#[command(long_about = "
BufScan reads files or stdin through a bounded buffer.
A FILE of '-' (or no FILE at all) means stdin.

Delimiters and patterns accept the escapes \\n \\r \\t \\0 \\\\ and \\xNN.

Examples:
  bufscan split '::' data.txt
  bufscan split '\\r\\n' capture.bin --json
  bufscan lines server.log --buffer-size 256
  bufscan find 'ERROR' server.log --last
  bufscan copy big.bin -o copy.bin --buffer-size 65536
")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split input into chunks on a multi-byte delimiter
    #[command(alias = "s")]
    Split {
        /// Delimiter to split on
        delimiter: String,

        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Bytes requested from the input per read
        #[arg(short, long, default_value_t = sizes::MIN_SPLIT_READ)]
        buffer_size: usize,
    },

    /// Print input line by line, handling LF and CRLF endings
    #[command(alias = "l")]
    Lines {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Reader buffer size; lines longer than this are joined from pieces
        #[arg(short, long, default_value_t = sizes::DEFAULT_BUF_SIZE)]
        buffer_size: usize,
    },

    /// Print byte offsets where a pattern occurs
    #[command(alias = "f")]
    Find {
        /// Pattern to search for
        pattern: String,

        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        /// Report only the last occurrence
        #[arg(long)]
        last: bool,
    },

    /// Copy input to output through a buffered reader and writer
    #[command(alias = "c")]
    Copy {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Buffer size for both reader and writer
        #[arg(short, long, default_value_t = sizes::DEFAULT_BUF_SIZE)]
        buffer_size: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Split {
            delimiter,
            file,
            json,
            buffer_size,
        } => cmd_split(&SplitOptions {
            delimiter: &delimiter,
            file: file.as_deref(),
            json,
            buffer_size,
        }),
        Commands::Lines {
            file,
            json,
            buffer_size,
        } => cmd_lines(&LinesOptions {
            file: file.as_deref(),
            json,
            buffer_size,
        }),
        Commands::Find {
            pattern,
            file,
            last,
        } => cmd_find(&pattern, file.as_deref(), last),
        Commands::Copy {
            file,
            output,
            buffer_size,
        } => cmd_copy(file.as_deref(), output.as_deref(), buffer_size),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_buffer_size_flag() {
        let cli = Cli::try_parse_from(["bufscan", "lines", "log.txt", "--buffer-size", "256"]).unwrap();
        match cli.command {
            Commands::Lines { buffer_size, .. } => assert_eq!(buffer_size, 256),
            _ => panic!("expected lines command"),
        }
        assert!(Cli::try_parse_from(["bufscan", "lines", "--max-line", "256"]).is_err());
    }

    #[test]
    fn test_buffer_size_defaults() {
        let cli = Cli::try_parse_from(["bufscan", "lines"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Lines { buffer_size: sizes::DEFAULT_BUF_SIZE, .. }
        ));

        let cli = Cli::try_parse_from(["bufscan", "split", "::"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Split { buffer_size: sizes::MIN_SPLIT_READ, .. }
        ));
    }
}
