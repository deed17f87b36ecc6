//! Buffer sizing configuration.
//!
//! # Sizes
//!
//! - Default buffer: 4 KB (4096 bytes)
//! - Minimum reader buffer: 16 bytes
//! - Splitter scratch buffer: at least 1 KB
//! - Consecutive empty reads tolerated from a source: 100

/// Common sizes used by readers, writers and the splitter.
pub mod sizes {
    /// Default buffer capacity (4 KB).
    pub const DEFAULT_BUF_SIZE: usize = 4096;
    /// Smallest capacity a [`BufReader`](crate::BufReader) will allocate.
    pub const MIN_BUF_SIZE: usize = 16;
    /// Minimum scratch buffer used by the splitter for each source read.
    pub const MIN_SPLIT_READ: usize = 1024;
    /// Number of zero-byte reads tolerated before a source is declared stuck.
    pub const MAX_CONSECUTIVE_EMPTY_READS: usize = 100;
}

/// Buffer configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufConfig {
    /// Capacity of the internal buffer in bytes.
    pub capacity: usize,
    /// How many zero-byte reads in a row a source may return before
    /// the reader gives up with [`BufError::NoProgress`](crate::BufError::NoProgress).
    pub max_empty_reads: usize,
}

impl BufConfig {
    /// Default configuration (4 KB buffer).
    pub const DEFAULT: Self = Self {
        capacity: sizes::DEFAULT_BUF_SIZE,
        max_empty_reads: sizes::MAX_CONSECUTIVE_EMPTY_READS,
    };

    /// Smallest allowed configuration (16 byte buffer).
    ///
    /// Mostly useful for exercising buffer-full paths.
    pub const SMALL: Self = Self {
        capacity: sizes::MIN_BUF_SIZE,
        max_empty_reads: sizes::MAX_CONSECUTIVE_EMPTY_READS,
    };

    /// Large configuration (64 KB buffer) for bulk copies.
    pub const LARGE: Self = Self {
        capacity: 64 * 1024,
        max_empty_reads: sizes::MAX_CONSECUTIVE_EMPTY_READS,
    };

    /// Create a configuration with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::DEFAULT
        }
    }

    /// Set the number of tolerated consecutive empty reads (at least 1).
    pub fn with_max_empty_reads(mut self, max_empty_reads: usize) -> Self {
        self.max_empty_reads = max_empty_reads.max(1);
        self
    }

    /// Capacity a reader actually allocates: never below [`sizes::MIN_BUF_SIZE`].
    pub fn reader_capacity(&self) -> usize {
        self.capacity.max(sizes::MIN_BUF_SIZE)
    }

    /// Capacity a writer actually allocates: zero falls back to the default.
    pub fn writer_capacity(&self) -> usize {
        if self.capacity == 0 {
            sizes::DEFAULT_BUF_SIZE
        } else {
            self.capacity
        }
    }
}

impl Default for BufConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
