//! medprobe CLI: run the hospital suite against a live deployment
//!
//! ## Usage
//!
//! ```bash
//! medprobe run --base-url http://localhost:4200       # Run every scenario
//! medprobe run --filter "patient search" --fail-fast  # Subset, stop early
//! medprobe fixture data/Result.xlsx Login ValidUserName ValidPassword
//! medprobe tables data/Result.xlsx
//! ```

use clap::Parser;
use medprobe_cli::{
    list_tables, logging, print_fixture, run_suite, show_config, Cli, CliConfig, CliResult,
    ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    logging::init_logging(&config);

    match cli.command {
        Commands::Run(args) => run_suite(&config, &args),
        Commands::Fixture(args) => print_fixture(&args),
        Commands::Tables(args) => list_tables(&args),
        Commands::Config(args) => show_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_log_json(cli.log_json)
}
