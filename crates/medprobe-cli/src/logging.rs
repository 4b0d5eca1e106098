//! Log subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the filter comes from the verbosity
//! flags. Events go to stderr so stdout stays clean for JSON output.

use crate::config::CliConfig;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the verbosity level
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_directive()))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init_logging(config: &CliConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(config.verbosity.is_verbose());

    let installed = if config.log_json {
        builder
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .try_init()
    } else {
        builder
            .with_ansi(config.color.should_color())
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
