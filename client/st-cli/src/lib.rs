//! st-cli library
//!
//! Argument types and command execution for the `story` binary, exported so
//! they can be exercised without spawning a process.

pub(crate) mod auth_commands;
pub(crate) mod cli;
pub(crate) mod commands;
pub(crate) mod error;
pub(crate) mod logger;
pub(crate) mod profile_commands;
pub(crate) mod runner;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use error::{CliError, Result as CliResult};
pub use runner::run;
