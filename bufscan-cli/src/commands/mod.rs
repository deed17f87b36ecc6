//! Command implementations for BufScan CLI.

pub mod copy;
pub mod find;
pub mod lines;
pub mod split;

pub use copy::cmd_copy;
pub use find::cmd_find;
pub use lines::{LinesOptions, cmd_lines};
pub use split::{SplitOptions, cmd_split};
