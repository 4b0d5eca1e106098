//! Subcommand implementations

use crate::commands::{FixtureArgs, RunArgs, SuiteArgs, TablesArgs};
use crate::config::{suite_config, CliConfig};
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use medprobe::{hospital_suite, Suite, SuiteResults};
use std::io::Write;

fn selected_suite(args: &RunArgs) -> Suite {
    let mut suite = hospital_suite();
    if let Some(filter) = &args.filter {
        suite = suite.with_filter(filter);
    }
    if args.fail_fast {
        suite = suite.with_fail_fast();
    }
    suite
}

/// Run the hospital suite in a fresh browser.
///
/// Prints each outcome, writes the JSON report when asked, and fails with
/// [`CliError::ScenariosFailed`] unless every selected scenario passed.
pub fn run_suite(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let suite = selected_suite(args);
    if args.list {
        let mut out = std::io::stdout().lock();
        for name in suite.selected_names() {
            writeln!(out, "{name}")?;
        }
        return Ok(());
    }

    let suite_config = suite_config(&args.suite)?;
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::config(format!("Failed to create tokio runtime: {e}")))?;
    let results = runtime.block_on(execute(&suite, suite_config))?;

    reporter.report(&results);
    if let Some(path) = &args.report {
        std::fs::write(path, results.to_json()?)?;
        tracing::info!(path = %path.display(), "results written");
    }

    if results.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: results.failed_count() + results.skipped.len(),
            total: results.total() + results.skipped.len(),
        })
    }
}

#[cfg(feature = "browser")]
async fn execute(suite: &Suite, config: medprobe::SuiteConfig) -> CliResult<SuiteResults> {
    let session = medprobe::Session::launch(config).await?;
    let results = suite.run(&session).await;
    if let Err(e) = session.driver().close().await {
        tracing::warn!(error = %e, "browser did not close cleanly");
    }
    Ok(results)
}

#[cfg(not(feature = "browser"))]
async fn execute(_suite: &Suite, _config: medprobe::SuiteConfig) -> CliResult<SuiteResults> {
    Err(CliError::config(
        "browser support not enabled. Rebuild with --features browser",
    ))
}

/// Print the records of one table as pretty JSON on stdout
pub fn print_fixture(args: &FixtureArgs) -> CliResult<()> {
    let columns: Vec<&str> = args.columns.iter().map(String::as_str).collect();
    let table = medprobe::fixture::load_fixture_table(&args.file, &args.table, &columns)?;

    let json = if args.first {
        let first = table.rows.first().ok_or_else(|| {
            medprobe::MedError::data_not_found(&args.file, &args.table, "table has no data rows")
        })?;
        serde_json::to_string_pretty(first)?
    } else {
        serde_json::to_string_pretty(&table)?
    };
    writeln!(std::io::stdout().lock(), "{json}")?;
    Ok(())
}

/// Print the table names of a workbook, one per line
pub fn list_tables(args: &TablesArgs) -> CliResult<()> {
    let mut out = std::io::stdout().lock();
    for name in medprobe::table_names(&args.file)? {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Print the effective suite configuration as YAML
pub fn show_config(args: &SuiteArgs) -> CliResult<()> {
    let config = suite_config(args)?;
    let yaml = serde_yaml_ng::to_string(&config)
        .map_err(|e| CliError::config(format!("cannot render configuration: {e}")))?;
    write!(std::io::stdout().lock(), "{yaml}")?;
    Ok(())
}
