//! Schedule stress CLI library.
//!
//! This crate provides the CLI interface for the stress and buffer engines.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, PeriodArg};
pub use config::{Colors, Config};
