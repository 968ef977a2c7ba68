//! Command-line interface
//!
//! Subcommands for both phases: `verify`/`setup`/`report` drive schema
//! discovery, `run` executes the transform pipeline, `validate` checks the
//! configuration.

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
