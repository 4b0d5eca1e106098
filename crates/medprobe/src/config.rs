//! Suite configuration.
//!
//! A [`SuiteConfig`] is usually read from a YAML file and then adjusted by
//! command-line flags. Every field has a default, so a partial file is valid.

use crate::driver::BrowserConfig;
use crate::result::{MedError, MedResult};
use crate::wait::{
    WaitOptions, DEFAULT_POLL_INITIAL_MS, DEFAULT_POLL_MAX_MS, DEFAULT_VISIBLE_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:4200";

/// Workbook bundled with the library crate
#[must_use]
pub fn default_data_file() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("Result.xlsx")
}

/// Configuration for one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Application root; relative paths are resolved against it
    pub base_url: String,
    /// Fixture workbook
    pub data_file: PathBuf,
    /// Run in headless mode
    pub headless: bool,
    /// Chromium sandbox (disable for containers)
    pub sandbox: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Highlight elements before interacting
    pub highlight: bool,
    /// Timeout for visibility waits
    pub visible_timeout_ms: u64,
    /// Timeout for other readiness waits
    pub action_timeout_ms: u64,
    /// Timeout for one scenario, including its precondition
    pub scenario_timeout_ms: u64,
    /// First polling interval
    pub poll_initial_ms: u64,
    /// Polling interval cap
    pub poll_max_ms: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        let browser = BrowserConfig::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_file: default_data_file(),
            headless: browser.headless,
            sandbox: browser.sandbox,
            chromium_path: browser.chromium_path,
            viewport_width: browser.viewport_width,
            viewport_height: browser.viewport_height,
            highlight: true,
            visible_timeout_ms: DEFAULT_VISIBLE_TIMEOUT_MS,
            action_timeout_ms: 10_000,
            scenario_timeout_ms: 120_000,
            poll_initial_ms: DEFAULT_POLL_INITIAL_MS,
            poll_max_ms: DEFAULT_POLL_MAX_MS,
        }
    }
}

impl SuiteConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML; missing keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Config`] when the text is not valid YAML for this shape.
    pub fn from_yaml(text: &str) -> MedResult<Self> {
        let config: Self = serde_yaml_ng::from_str(text).map_err(|e| MedError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Io`] when the file cannot be read, or
    /// [`MedError::Config`] when it does not parse.
    pub fn load(path: impl AsRef<Path>) -> MedResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Config`] describing the first violation.
    pub fn validate(&self) -> MedResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(MedError::Config {
                message: format!("base_url must be an http(s) URL, got {:?}", self.base_url),
            });
        }
        if self.poll_initial_ms > self.poll_max_ms {
            return Err(MedError::Config {
                message: "poll_initial_ms must not exceed poll_max_ms".to_string(),
            });
        }
        Ok(())
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set fixture workbook
    #[must_use]
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Enable or disable highlighting
    #[must_use]
    pub const fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Set all wait timeouts at once
    #[must_use]
    pub const fn with_timeouts(
        mut self,
        visible_ms: u64,
        action_ms: u64,
        scenario_ms: u64,
    ) -> Self {
        self.visible_timeout_ms = visible_ms;
        self.action_timeout_ms = action_ms;
        self.scenario_timeout_ms = scenario_ms;
        self
    }

    /// Set polling backoff bounds
    #[must_use]
    pub const fn with_backoff(mut self, initial_ms: u64, max_ms: u64) -> Self {
        self.poll_initial_ms = initial_ms;
        self.poll_max_ms = max_ms;
        self
    }

    /// Browser launch settings
    #[must_use]
    pub fn browser(&self) -> BrowserConfig {
        let mut browser = BrowserConfig::default()
            .with_headless(self.headless)
            .with_viewport(self.viewport_width, self.viewport_height);
        if !self.sandbox {
            browser = browser.with_no_sandbox();
        }
        if let Some(ref path) = self.chromium_path {
            browser = browser.with_chromium_path(path.clone());
        }
        browser
    }

    /// Wait options for visibility waits
    #[must_use]
    pub const fn visible_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.visible_timeout_ms,
            poll_initial_ms: self.poll_initial_ms,
            poll_max_ms: self.poll_max_ms,
        }
    }

    /// Wait options for other readiness waits
    #[must_use]
    pub const fn action_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.action_timeout_ms,
            poll_initial_ms: self.poll_initial_ms,
            poll_max_ms: self.poll_max_ms,
        }
    }

    /// Resolve a path against `base_url`; absolute URLs pass through
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = SuiteConfig::default();
            assert_eq!(config.visible_timeout_ms, 20_000);
            assert_eq!(config.poll_initial_ms, 50);
            assert_eq!(config.poll_max_ms, 500);
            assert!(config.highlight);
            assert!(config.data_file.ends_with("data/Result.xlsx"));
        }

        #[test]
        fn test_browser_settings_follow_config() {
            let browser = SuiteConfig::new()
                .with_headless(false)
                .with_no_sandbox()
                .with_chromium_path("/usr/bin/chromium")
                .browser();
            assert!(!browser.headless);
            assert!(!browser.sandbox);
            assert_eq!(browser.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_partial_yaml() {
            let yaml = "base_url: https://his.example.org\nhighlight: false\n";
            let config = SuiteConfig::from_yaml(yaml).unwrap();
            assert_eq!(config.base_url, "https://his.example.org");
            assert!(!config.highlight);
            assert_eq!(config.visible_timeout_ms, 20_000);
        }

        #[test]
        fn test_bad_yaml_is_config_error() {
            let err = SuiteConfig::from_yaml("visible_timeout_ms: soon").unwrap_err();
            assert!(matches!(err, MedError::Config { .. }));
        }

        #[test]
        fn test_backoff_must_be_ordered() {
            let err = SuiteConfig::from_yaml("poll_initial_ms: 900\npoll_max_ms: 100").unwrap_err();
            assert!(err.to_string().contains("poll_initial_ms"));
        }

        #[test]
        fn test_load_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.yaml");
            std::fs::write(&path, "headless: false\nscenario_timeout_ms: 5000\n").unwrap();
            let config = SuiteConfig::load(&path).unwrap();
            assert!(!config.headless);
            assert_eq!(config.scenario_timeout_ms, 5000);
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_url_joins_base() {
            let config = SuiteConfig::new().with_base_url("http://host:4200/");
            assert_eq!(config.url("/"), "http://host:4200/");
            assert_eq!(config.url("#/Patient"), "http://host:4200/#/Patient");
            assert_eq!(config.url("https://other/x"), "https://other/x");
        }
    }
}
