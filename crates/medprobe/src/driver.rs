//! Browser driver seam.
//!
//! Page objects talk to the browser only through [`BrowserDriver`]. The
//! trait covers the primitives the suite needs: navigation, element lookup by
//! [`Selector`], fill/click/hover/key presses, text reads, style mutation for
//! the highlighter, and alert capture.
//!
//! # Implementations
//!
//! - `ChromiumDriver` - real Chromium over CDP (feature `browser`)
//! - [`MockDriver`](crate::mock::MockDriver) - in-memory page model for tests

use crate::locator::Selector;
use crate::result::MedResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Browser launch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1366,
            viewport_height: 768,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Inline style change applied to an element, optionally reverted later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMutation {
    /// CSS property/value pairs (JS style property names)
    pub properties: Vec<(String, String)>,
    /// Restore the previous values after this long
    pub revert_after: Option<Duration>,
}

impl StyleMutation {
    /// Create an empty mutation
    #[must_use]
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            revert_after: None,
        }
    }

    /// Add a property
    #[must_use]
    pub fn set(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((property.into(), value.into()));
        self
    }

    /// Schedule a revert
    #[must_use]
    pub const fn revert_after(mut self, delay: Duration) -> Self {
        self.revert_after = Some(delay);
        self
    }
}

impl Default for StyleMutation {
    fn default() -> Self {
        Self::new()
    }
}

/// Abstract driver trait for browser automation.
///
/// Every method resolves its selector at call time. Single-element
/// operations act on the first match and fail with
/// [`MedError::Interaction`](crate::MedError::Interaction) when nothing
/// matches.
#[async_trait]
pub trait BrowserDriver: Send + Sync + std::fmt::Debug {
    /// Navigate to an absolute URL
    async fn goto(&self, url: &str) -> MedResult<()>;

    /// Current page URL
    async fn current_url(&self) -> MedResult<String>;

    /// Number of elements matching the selector
    async fn count(&self, selector: &Selector) -> MedResult<usize>;

    /// Whether the first match exists and is rendered
    async fn is_visible(&self, selector: &Selector) -> MedResult<bool>;

    /// Replace the value of an input
    async fn fill(&self, selector: &Selector, value: &str) -> MedResult<()>;

    /// Clear an input
    async fn clear(&self, selector: &Selector) -> MedResult<()>;

    /// Click the first match
    async fn click(&self, selector: &Selector) -> MedResult<()>;

    /// Move the pointer over the first match
    async fn hover(&self, selector: &Selector) -> MedResult<()>;

    /// Press a key (e.g. `"Enter"`) with the first match focused
    async fn press_key(&self, selector: &Selector, key: &str) -> MedResult<()>;

    /// Rendered text of the first match
    async fn inner_text(&self, selector: &Selector) -> MedResult<String>;

    /// Rendered text of every match, in document order
    async fn all_inner_texts(&self, selector: &Selector) -> MedResult<Vec<String>>;

    /// Raw text content of the first match, `None` when nothing matches
    async fn text_content(&self, selector: &Selector) -> MedResult<Option<String>>;

    /// Attribute of the first match
    async fn attribute(&self, selector: &Selector, name: &str) -> MedResult<Option<String>>;

    /// Choose an option of a `<select>` by its visible label
    async fn select_option(&self, selector: &Selector, label: &str) -> MedResult<()>;

    /// Apply an inline style change to the first match
    async fn apply_style(&self, selector: &Selector, style: &StyleMutation) -> MedResult<()>;

    /// Start accepting alert/confirm dialogs and recording their messages
    async fn arm_dialog_capture(&self) -> MedResult<()>;

    /// Take the most recent captured dialog message
    async fn take_dialog_message(&self) -> MedResult<Option<String>>;

    /// Close the browser
    async fn close(&self) -> MedResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod browser_config_tests {
        use super::*;

        #[test]
        fn test_config_default() {
            let config = BrowserConfig::default();
            assert!(config.headless);
            assert!(config.sandbox);
            assert!(config.chromium_path.is_none());
        }

        #[test]
        fn test_config_builder() {
            let config = BrowserConfig::default()
                .with_headless(false)
                .with_viewport(800, 600)
                .with_chromium_path("/usr/bin/chromium")
                .with_no_sandbox();

            assert!(!config.headless);
            assert_eq!(config.viewport_width, 800);
            assert_eq!(config.viewport_height, 600);
            assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
            assert!(!config.sandbox);
        }

        #[test]
        fn test_config_partial_yaml() {
            let config: BrowserConfig = serde_yaml_ng::from_str("headless: false").unwrap();
            assert!(!config.headless);
            assert_eq!(config.viewport_width, 1366);
        }
    }

    mod style_mutation_tests {
        use super::*;

        #[test]
        fn test_builder() {
            let style = StyleMutation::new()
                .set("border", "2px solid yellow")
                .revert_after(Duration::from_secs(1));
            assert_eq!(style.properties.len(), 1);
            assert_eq!(style.revert_after, Some(Duration::from_secs(1)));
        }
    }
}
