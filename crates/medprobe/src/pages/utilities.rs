//! Billing utilities screen.

use crate::locator::Locator;
use crate::result::MedResult;
use crate::session::Session;
use tokio::time::Instant;

/// Utilities module and its billing counter selection
#[derive(Debug, Clone)]
pub struct UtilitiesPage {
    session: Session,
    /// Sidebar link to the utilities module
    pub utilities_link: Locator,
    /// Tab for changing the billing counter
    pub change_billing_counter_tab: Locator,
    /// Billing counter tiles
    pub counter_items: Locator,
}

impl UtilitiesPage {
    /// Create the page object
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            utilities_link: Locator::css("utilities link", "a[href=\"#/Utilities\"]"),
            change_billing_counter_tab: Locator::css(
                "change billing counter tab",
                "a[href=\"#/Utilities/ChangeBillingCounter\"]",
            ),
            counter_items: Locator::css("billing counter tiles", "div.counter-item"),
        }
    }

    /// Navigate to the billing counter selection and verify the counters
    /// load within the visibility timeout.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`](crate::MedError::Timeout) when the
    /// counters never appear.
    pub async fn verify_billing_counter_load_state(&self) -> MedResult<bool> {
        let start = Instant::now();
        self.session.click(&self.utilities_link).await?;
        self.session.click(&self.change_billing_counter_tab).await?;
        self.session.wait_visible(&self.counter_items).await?;

        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(elapsed_ms, "billing counters loaded");
        Ok(true)
    }
}
