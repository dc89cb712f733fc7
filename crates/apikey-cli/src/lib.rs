//! # apikey-cli
//!
//! Command line front end for apikey-core.

mod commands;

pub use commands::{exit_code, run, Cli, Command};
