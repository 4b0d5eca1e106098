//! CLI configuration

use crate::commands::SuiteArgs;
use crate::error::CliResult;
use medprobe::SuiteConfig;
use serde::{Deserialize, Serialize};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Level from the `-q` flag and `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default log filter directive for this level
    #[must_use]
    pub const fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn,medprobe=info",
            Self::Verbose => "info,medprobe=debug",
            Self::Debug => "debug,medprobe=trace",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// JSON log lines
    pub log_json: bool,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set JSON logging
    #[must_use]
    pub const fn with_log_json(mut self, log_json: bool) -> Self {
        self.log_json = log_json;
        self
    }
}

/// Build the suite configuration: YAML file first, then flag and
/// environment overrides.
pub fn suite_config(args: &SuiteArgs) -> CliResult<SuiteConfig> {
    let mut config = match &args.config {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };

    if let Some(url) = &args.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(data) = &args.data {
        config.data_file.clone_from(data);
    }
    if args.headed {
        config.headless = false;
    }
    if args.no_sandbox {
        config.sandbox = false;
    }
    if let Some(path) = &args.chromium_path {
        config.chromium_path = Some(path.clone());
    }
    if args.no_highlight {
        config.highlight = false;
    }
    if let Some(ms) = args.scenario_timeout {
        config.scenario_timeout_ms = ms;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Debug);
        }

        #[test]
        fn test_directives_mention_crate() {
            assert!(Verbosity::Verbose.log_directive().contains("medprobe=debug"));
            assert_eq!(Verbosity::Quiet.log_directive(), "error");
        }
    }

    mod suite_config_tests {
        use super::*;

        #[test]
        fn test_defaults_without_sources() {
            let config = suite_config(&SuiteArgs::default()).unwrap();
            assert_eq!(config, SuiteConfig::default());
        }

        #[test]
        fn test_flags_override_file() {
            let mut file = NamedTempFile::new().unwrap();
            writeln!(file, "base_url: http://from-file.test").unwrap();
            writeln!(file, "headless: true").unwrap();
            writeln!(file, "visible_timeout_ms: 5000").unwrap();

            let args = SuiteArgs {
                config: Some(file.path().to_path_buf()),
                base_url: Some("http://from-flag.test".into()),
                headed: true,
                no_highlight: true,
                ..SuiteArgs::default()
            };
            let config = suite_config(&args).unwrap();
            assert_eq!(config.base_url, "http://from-flag.test");
            assert!(!config.headless);
            assert!(!config.highlight);
            assert_eq!(config.visible_timeout_ms, 5000);
        }

        #[test]
        fn test_invalid_url_rejected() {
            let args = SuiteArgs {
                base_url: Some("ftp://his.test".into()),
                ..SuiteArgs::default()
            };
            assert!(suite_config(&args).is_err());
        }

        #[test]
        fn test_missing_config_file() {
            let args = SuiteArgs {
                config: Some("/nonexistent/suite.yaml".into()),
                ..SuiteArgs::default()
            };
            assert!(suite_config(&args).is_err());
        }
    }
}
