//! Laboratory settings and lab-test list.

use crate::locator::Locator;
use crate::result::MedResult;
use crate::session::Session;

/// Table holding the expected star-icon tooltip
pub const TOOLTIP_TABLE: &str = "ToolTipText";

/// Column holding the expected star-icon tooltip
pub const STAR_TOOLTIP_COLUMN: &str = "StarTooltipText";

/// Table holding the lab notification text
pub const LAB_NOTIFICATION_TABLE: &str = "LabNotificationText";

/// Column holding the lab notification text
pub const LAB_NOTIFICATION_COLUMN: &str = "LabTextNotification";

/// Laboratory module
#[derive(Debug, Clone)]
pub struct LaboratoryPage {
    session: Session,
    /// Sidebar link to the laboratory module
    pub laboratory_link: Locator,
    /// Settings tab
    pub settings_tab: Locator,
    /// Opens the new-lab-test form
    pub add_new_lab_test: Locator,
    /// Submits the new-lab-test form
    pub add_button: Locator,
    /// Validation message of the lab test code field
    pub error_message: Locator,
    /// Favourite star icon of the lab list
    pub star_icon: Locator,
    /// Tooltip shown while hovering the star icon
    pub tooltip: Locator,
}

impl LaboratoryPage {
    /// Create the page object
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            laboratory_link: Locator::css("laboratory link", "a[href=\"#/Lab\"]"),
            settings_tab: Locator::css("lab settings tab", "a[href=\"#/Lab/Settings\"]"),
            add_new_lab_test: Locator::xpath(
                "add new lab test button",
                "//a[contains(text(),'Add New Lab Test')]",
            ),
            add_button: Locator::css("add lab test button", "input[value='Add']"),
            error_message: Locator::xpath(
                "lab test code error",
                "//span[contains(text(),'Lab Test Code Required')]",
            ),
            star_icon: Locator::css("favourite star icon", "i.icon-favourite"),
            tooltip: Locator::css("star tooltip", "div.tooltip-inner"),
        }
    }

    /// Submit an empty new-lab-test form and return the trimmed validation
    /// message.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`](crate::MedError::Timeout) when no message
    /// appears.
    pub async fn verify_error_message(&self) -> MedResult<String> {
        self.session.click(&self.laboratory_link).await?;
        self.session.click(&self.settings_tab).await?;
        self.session.click(&self.add_new_lab_test).await?;
        self.session.click(&self.add_button).await?;
        self.session.text(&self.error_message).await
    }

    /// Hover the star icon and return the trimmed tooltip text
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`](crate::MedError::Timeout) when no tooltip
    /// appears.
    pub async fn verify_star_tooltip(&self) -> MedResult<String> {
        self.session.click(&self.laboratory_link).await?;
        self.session.hover(&self.star_icon).await?;
        let text = self.session.text(&self.tooltip).await?;
        tracing::debug!(%text, "star tooltip");
        Ok(text)
    }
}
