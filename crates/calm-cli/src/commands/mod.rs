//! CLI subcommand implementations.

pub mod buffers;
pub mod stress;
pub mod util;
