//! CLI subcommands.

pub mod analyze;
pub mod batch;
pub mod categories;
pub mod config;
pub mod output;
