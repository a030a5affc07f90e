//! Formatting helpers shared by the CLI commands

mod date;

pub use date::*;
