//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// medprobe: browser end-to-end suite for the hospital-management application
#[derive(Parser, Debug)]
#[command(name = "medprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit log events as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the hospital suite against a live deployment
    Run(RunArgs),

    /// Print records of one fixture table as JSON
    Fixture(FixtureArgs),

    /// List the tables of a fixture workbook
    Tables(TablesArgs),

    /// Show the effective suite configuration as YAML
    Config(SuiteArgs),
}

/// Suite configuration sources shared by `run` and `config`
#[derive(Args, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SuiteArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Application root URL
    #[arg(long, env = "MEDPROBE_BASE_URL")]
    pub base_url: Option<String>,

    /// Fixture workbook
    #[arg(long, env = "MEDPROBE_DATA")]
    pub data: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the Chromium sandbox (containers)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Path to the chromium binary
    #[arg(long = "chromium", env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,

    /// Do not highlight elements before interacting
    #[arg(long)]
    pub no_highlight: bool,

    /// Per-scenario timeout in milliseconds
    #[arg(long)]
    pub scenario_timeout: Option<u64>,
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Configuration sources
    #[command(flatten)]
    pub suite: SuiteArgs,

    /// Run only scenarios whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// List the selected scenarios without running them
    #[arg(long)]
    pub list: bool,

    /// Write the JSON results to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the fixture command
#[derive(Args, Debug, Clone)]
pub struct FixtureArgs {
    /// Workbook path
    pub file: PathBuf,

    /// Table (sheet) name
    pub table: String,

    /// Columns to project
    #[arg(required = true)]
    pub columns: Vec<String>,

    /// Print only the first record
    #[arg(long)]
    pub first: bool,
}

/// Arguments for the tables command
#[derive(Args, Debug, Clone)]
pub struct TablesArgs {
    /// Workbook path
    pub file: PathBuf,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
