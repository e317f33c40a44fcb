//! Verificador: command-line front end for the verificar harness.
//!
//! Embeds the verification scenarios for the wasteland client as built-ins,
//! loads extra scenarios from YAML files, runs them sequentially (one fresh
//! browser session each), and maps the suite outcome onto the process exit
//! code.

pub mod cli;
pub mod error;
pub mod output;
pub mod scenarios;

pub use cli::{Cli, Commands, ListArgs, RunArgs};
pub use error::{CliError, CliResult};
pub use output::Reporter;
