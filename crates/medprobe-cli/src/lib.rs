//! medprobe CLI library
//!
//! Command-line interface for running the hospital suite and inspecting
//! fixture workbooks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, FixtureArgs, RunArgs, SuiteArgs, TablesArgs};
pub use config::{suite_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{summary_line, Reporter};
pub use runner::{list_tables, print_fixture, run_suite, show_config};
