//! Radiology imaging requests.

use crate::locator::Locator;
use crate::result::MedResult;
use crate::session::Session;

/// Imaging requisition list
#[derive(Debug, Clone)]
pub struct RadiologyPage {
    session: Session,
    /// Sidebar link to the radiology module
    pub radiology_link: Locator,
    /// List-requests tab
    pub list_requests_tab: Locator,
    /// "Add Scan Done Detail" button of the first request
    pub scan_done_button: Locator,
    /// Done button of the scan detail form
    pub done_button: Locator,
}

impl RadiologyPage {
    /// Create the page object
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            radiology_link: Locator::css("radiology link", "a[href=\"#/Radiology\"]"),
            list_requests_tab: Locator::css(
                "list requests tab",
                "a[href=\"#/Radiology/ImagingRequisitionList\"]",
            ),
            scan_done_button: Locator::xpath(
                "add scan done button",
                "(//a[contains(text(),'Add Scan Done Detail')])[1]",
            ),
            done_button: Locator::xpath("scan done submit", "//button[contains(text(),'Done')]"),
        }
    }

    /// Submit a scan-done detail and accept the alert it raises.
    ///
    /// Returns `true` once a dialog message was captured.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`](crate::MedError::Timeout) when no dialog
    /// appears, or the interaction error that stopped the flow.
    pub async fn perform_radiology_request_and_handle_alert(&self) -> MedResult<bool> {
        self.session.click(&self.radiology_link).await?;
        self.session.click(&self.list_requests_tab).await?;
        self.session.driver().arm_dialog_capture().await?;

        self.session.click(&self.scan_done_button).await?;
        self.session.click(&self.done_button).await?;

        let driver = self.session.driver();
        let message = self
            .session
            .action_waiter()
            .poll("radiology alert", move || async move {
                driver.take_dialog_message().await
            })
            .await?
            .value;
        tracing::info!(%message, "alert accepted");
        Ok(true)
    }
}
