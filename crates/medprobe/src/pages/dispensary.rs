//! Pharmacy dispensary screen.

use crate::locator::Locator;
use crate::result::{MedError, MedResult};
use crate::session::Session;

/// URL fragment of the dispensary module
const DISPENSARY_ROUTE: &str = "#/Dispensary";

/// Dispensary counter activation
#[derive(Debug, Clone)]
pub struct DispensaryPage {
    session: Session,
    /// Sidebar link to the dispensary module
    pub dispensary_link: Locator,
    /// Counter tiles offered on entry
    pub counter_items: Locator,
    /// First counter tile
    pub first_counter: Locator,
    /// Banner naming the active counter
    pub active_counter_message: Locator,
    /// Dispensary page heading
    pub page_heading: Locator,
}

impl DispensaryPage {
    /// Create the page object
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            dispensary_link: Locator::css("dispensary link", "a[href=\"#/Dispensary\"]"),
            counter_items: Locator::css("dispensary counter tiles", "div.counter-item"),
            first_counter: Locator::xpath(
                "first dispensary counter",
                "(//div[contains(@class,'counter-item')])[1]",
            ),
            active_counter_message: Locator::xpath(
                "active counter banner",
                "//div[contains(text(),'Activated Counter')]",
            ),
            page_heading: Locator::css("dispensary heading", "div.page-bar"),
        }
    }

    async fn activate_first_counter(&self) -> MedResult<String> {
        self.session.click(&self.dispensary_link).await?;
        if self.session.is_visible(&self.active_counter_message).await? {
            return self.session.text(&self.active_counter_message).await;
        }
        self.session.click(&self.first_counter).await?;
        self.session.text(&self.active_counter_message).await
    }

    /// Open the dispensary, activate the first counter, and check the
    /// confirmation banner appears.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::AssertionMismatch`] when the banner does not name
    /// an activated counter, or the interaction error that stopped the flow.
    pub async fn verify_active_counter_message_in_dispensary(&self) -> MedResult<bool> {
        let message = self.activate_first_counter().await?;
        if !message.contains("Activated Counter") {
            return Err(MedError::mismatch(format!(
                "unexpected counter banner {message:?}"
            )));
        }
        tracing::info!(%message, "dispensary counter active");
        Ok(true)
    }

    /// Whether a dispensary counter is active after opening the module
    ///
    /// # Errors
    ///
    /// Returns the interaction error that stopped the flow.
    pub async fn verify_counter_is_activated(&self) -> MedResult<bool> {
        let message = self.activate_first_counter().await?;
        Ok(message.contains("Activated Counter"))
    }

    /// Open the dispensary and confirm the browser landed on it
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Navigation`] when the URL never reaches the
    /// dispensary route.
    pub async fn navigate_to_dispensary(&self) -> MedResult<bool> {
        self.session.click(&self.dispensary_link).await?;

        let driver = self.session.driver();
        let reached = self
            .session
            .action_waiter()
            .until("dispensary route", move || async move {
                Ok(driver.current_url().await?.contains(DISPENSARY_ROUTE))
            })
            .await;
        if let Err(e) = reached {
            let url = driver.current_url().await.unwrap_or_default();
            return Err(MedError::Navigation {
                url,
                message: format!("dispensary did not open: {e}"),
            });
        }

        self.session.wait_visible(&self.page_heading).await?;
        Ok(true)
    }
}
