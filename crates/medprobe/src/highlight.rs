//! Element highlighting for visual debugging.
//!
//! Before each interaction the suite marks the target element with a yellow
//! border and background, then lets the page restore the previous style one
//! second later. The change is purely cosmetic.

use crate::driver::{BrowserDriver, StyleMutation};
use crate::locator::Locator;
use crate::result::{MedError, MedResult};
use std::time::Duration;

/// Border applied while highlighted
pub const HIGHLIGHT_BORDER: &str = "2px solid yellow";

/// Background applied while highlighted
pub const HIGHLIGHT_BACKGROUND: &str = "yellow";

/// How long the highlight stays before the page reverts it
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(1000);

/// The style change applied by [`highlight`]
#[must_use]
pub fn highlight_style() -> StyleMutation {
    StyleMutation::new()
        .set("border", HIGHLIGHT_BORDER)
        .set("backgroundColor", HIGHLIGHT_BACKGROUND)
        .revert_after(HIGHLIGHT_DURATION)
}

/// Highlight the first element `locator` resolves to.
///
/// Returns as soon as the style is applied; the revert runs in the page.
///
/// # Errors
///
/// Returns [`MedError::Interaction`] naming the locator when the element
/// cannot be resolved or the style change is rejected.
pub async fn highlight(driver: &dyn BrowserDriver, locator: &Locator) -> MedResult<()> {
    driver
        .apply_style(locator.selector(), &highlight_style())
        .await
        .map_err(|e| match e {
            MedError::Interaction { message, .. } => MedError::interaction(locator.name(), message),
            other => MedError::interaction(locator.name(), other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};

    #[tokio::test]
    async fn test_highlight_applies_then_reverts() {
        let driver = MockDriver::new();
        let login = Locator::id("login button", "login");
        driver.put(&login, MockElement::visible("Sign In"));

        highlight(&driver, &login).await.unwrap();
        let selector = login.selector().clone();
        assert_eq!(
            driver.inspect(|p| p.style_of(&selector, "border")),
            Some(HIGHLIGHT_BORDER.to_string())
        );
        assert_eq!(
            driver.inspect(|p| p.style_of(&selector, "backgroundColor")),
            Some(HIGHLIGHT_BACKGROUND.to_string())
        );

        let log = driver.style_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].1.revert_after, Some(HIGHLIGHT_DURATION));

        driver.flush_reverts();
        assert_eq!(driver.inspect(|p| p.style_of(&selector, "border")), None);
    }

    #[tokio::test]
    async fn test_unresolvable_element_names_locator() {
        let driver = MockDriver::new();
        let missing = Locator::id("admin menu", "nope");
        let err = highlight(&driver, &missing).await.unwrap_err();
        match err {
            MedError::Interaction { locator, .. } => assert_eq!(locator, "admin menu"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
