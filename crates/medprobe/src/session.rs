//! Shared browser session.
//!
//! A [`Session`] pairs the one driver of a run with its configuration and is
//! cloned into every page object. Its element helpers follow a fixed shape:
//! wait for the element, highlight it, interact, and report failures under
//! the locator's display name.

use crate::config::SuiteConfig;
use crate::driver::BrowserDriver;
use crate::fixture::{self, RowRecord};
use crate::highlight::highlight;
use crate::locator::Locator;
use crate::result::{MedError, MedResult};
use crate::wait::Waiter;
use std::path::Path;
use std::sync::Arc;

/// Driver plus configuration, shared by every page object of a run
#[derive(Debug, Clone)]
pub struct Session {
    driver: Arc<dyn BrowserDriver>,
    config: Arc<SuiteConfig>,
}

impl Session {
    /// Wrap an already-running driver
    #[must_use]
    pub fn new(driver: Arc<dyn BrowserDriver>, config: SuiteConfig) -> Self {
        Self {
            driver,
            config: Arc::new(config),
        }
    }

    /// Launch Chromium with the configured browser settings
    ///
    /// # Errors
    ///
    /// Returns [`MedError::BrowserLaunch`] if Chromium cannot be started.
    #[cfg(feature = "browser")]
    pub async fn launch(config: SuiteConfig) -> MedResult<Self> {
        let driver = crate::chromium::ChromiumDriver::launch(config.browser()).await?;
        Ok(Self::new(Arc::new(driver), config))
    }

    /// The driver
    #[must_use]
    pub fn driver(&self) -> &dyn BrowserDriver {
        self.driver.as_ref()
    }

    /// The configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// The fixture workbook
    #[must_use]
    pub fn data_file(&self) -> &Path {
        &self.config.data_file
    }

    /// Waiter for visibility waits
    #[must_use]
    pub fn visible_waiter(&self) -> Waiter {
        Waiter::with_options(self.config.visible_wait())
    }

    /// Waiter for other readiness waits
    #[must_use]
    pub fn action_waiter(&self) -> Waiter {
        Waiter::with_options(self.config.action_wait())
    }

    // =========================================================================
    // Fixtures
    // =========================================================================

    /// Load columns of a table from the configured workbook
    ///
    /// # Errors
    ///
    /// See [`fixture::load_table`].
    pub fn fixture(&self, table: &str, columns: &[&str]) -> MedResult<Vec<RowRecord>> {
        fixture::load_table(self.data_file(), table, columns)
    }

    /// First row of a table from the configured workbook
    ///
    /// # Errors
    ///
    /// See [`fixture::first_row`].
    pub fn fixture_row(&self, table: &str, columns: &[&str]) -> MedResult<RowRecord> {
        fixture::first_row(self.data_file(), table, columns)
    }

    /// One required value from the first row of a table
    ///
    /// # Errors
    ///
    /// Returns [`MedError::DataNotFound`] naming the file and table when the
    /// table, row, or value is missing.
    pub fn fixture_value(&self, table: &str, column: &str) -> MedResult<String> {
        let row = self.fixture_row(table, &[column])?;
        row.get(column).map(str::to_string).ok_or_else(|| {
            MedError::data_not_found(self.data_file(), table, format!("column {column:?} is empty"))
        })
    }

    // =========================================================================
    // Element actions
    // =========================================================================

    /// Navigate to a path under the base URL
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Navigation`] when the page cannot be loaded.
    pub async fn goto(&self, path: &str) -> MedResult<()> {
        let url = self.config.url(path);
        tracing::debug!(%url, "navigate");
        self.driver.goto(&url).await
    }

    /// Highlight an element when highlighting is enabled
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Interaction`] when the element cannot be resolved.
    pub async fn highlight(&self, locator: &Locator) -> MedResult<()> {
        if self.config.highlight {
            highlight(self.driver(), locator).await?;
        }
        Ok(())
    }

    /// Whether the element is currently visible
    ///
    /// # Errors
    ///
    /// Returns the driver's error, renamed after the locator.
    pub async fn is_visible(&self, locator: &Locator) -> MedResult<bool> {
        self.driver
            .is_visible(locator.selector())
            .await
            .map_err(|e| named(locator, e))
    }

    /// Wait for the element to become visible
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] after the visibility timeout.
    pub async fn wait_visible(&self, locator: &Locator) -> MedResult<()> {
        self.visible_waiter().until_visible(self.driver(), locator).await
    }

    /// Wait, highlight, then click
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] or [`MedError::Interaction`] naming the locator.
    pub async fn click(&self, locator: &Locator) -> MedResult<()> {
        self.wait_visible(locator).await?;
        self.highlight(locator).await?;
        tracing::debug!(locator = locator.name(), "click");
        self.driver
            .click(locator.selector())
            .await
            .map_err(|e| named(locator, e))
    }

    /// Wait, highlight, then replace the input's value
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] or [`MedError::Interaction`] naming the locator.
    pub async fn fill(&self, locator: &Locator, value: &str) -> MedResult<()> {
        self.wait_visible(locator).await?;
        self.highlight(locator).await?;
        tracing::debug!(locator = locator.name(), "fill");
        self.driver
            .fill(locator.selector(), value)
            .await
            .map_err(|e| named(locator, e))
    }

    /// Clear an input
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Interaction`] naming the locator.
    pub async fn clear(&self, locator: &Locator) -> MedResult<()> {
        self.driver
            .clear(locator.selector())
            .await
            .map_err(|e| named(locator, e))
    }

    /// Press a key with the element focused
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Interaction`] naming the locator.
    pub async fn press(&self, locator: &Locator, key: &str) -> MedResult<()> {
        self.driver
            .press_key(locator.selector(), key)
            .await
            .map_err(|e| named(locator, e))
    }

    /// Wait, highlight, then hover
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] or [`MedError::Interaction`] naming the locator.
    pub async fn hover(&self, locator: &Locator) -> MedResult<()> {
        self.wait_visible(locator).await?;
        self.highlight(locator).await?;
        self.driver
            .hover(locator.selector())
            .await
            .map_err(|e| named(locator, e))
    }

    /// Wait, highlight, then choose an option by label
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] or [`MedError::Interaction`] naming the locator.
    pub async fn select(&self, locator: &Locator, label: &str) -> MedResult<()> {
        self.wait_visible(locator).await?;
        self.highlight(locator).await?;
        self.driver
            .select_option(locator.selector(), label)
            .await
            .map_err(|e| named(locator, e))
    }

    /// Wait for visible, non-blank text and return it trimmed
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] naming the locator.
    pub async fn text(&self, locator: &Locator) -> MedResult<String> {
        let text = self.action_waiter().until_text(self.driver(), locator).await?;
        Ok(text.trim().to_string())
    }

    /// Current text of the first match, without waiting
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Interaction`] naming the locator.
    pub async fn text_now(&self, locator: &Locator) -> MedResult<Option<String>> {
        self.driver
            .text_content(locator.selector())
            .await
            .map_err(|e| named(locator, e))
    }

    /// Trimmed text of every match
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Interaction`] naming the locator.
    pub async fn texts(&self, locator: &Locator) -> MedResult<Vec<String>> {
        let texts = self
            .driver
            .all_inner_texts(locator.selector())
            .await
            .map_err(|e| named(locator, e))?;
        Ok(texts.into_iter().map(|t| t.trim().to_string()).collect())
    }
}

/// Rename an interaction failure after the locator's display name
fn named(locator: &Locator, err: MedError) -> MedError {
    match err {
        MedError::Interaction { message, .. } => MedError::interaction(locator.name(), message),
        other => other,
    }
}

/// Adapter from typed results to the boolean success flag some scenarios use.
pub trait ActionOutcome {
    /// `true` on success; on failure logs the cause and returns `false`
    fn flag(self, action: &str) -> bool;
}

impl ActionOutcome for MedResult<()> {
    fn flag(self, action: &str) -> bool {
        self.map(|()| true).flag(action)
    }
}

/// Boolean-returning actions succeed only with `Ok(true)`.
impl ActionOutcome for MedResult<bool> {
    fn flag(self, action: &str) -> bool {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(action, error = %e, "action failed");
                false
            }
        }
    }
}
