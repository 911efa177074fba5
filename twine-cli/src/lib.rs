//! Command line front end for the twine strings database.
//!
//! The binary parses a [`Cli`] and hands it to [`run`]; the modules are public
//! so the operations can be driven without spawning a process.

pub mod cli;
pub mod config;
pub mod error;
pub mod loc_drop;
pub mod runner;

pub use cli::{Cli, Command, CommonArgs, run};
pub use config::Config;
pub use error::CliError;
pub use runner::{Runner, RunnerOptions};
