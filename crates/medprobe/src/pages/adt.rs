//! Admission, discharge, and transfer screen.

use super::search::PatientSearchHelper;
use crate::locator::Locator;
use crate::result::MedResult;
use crate::session::Session;

/// ADT patient search
#[derive(Debug, Clone)]
pub struct AdtPage {
    session: Session,
    search: PatientSearchHelper,
    /// Sidebar link to the ADT module
    pub adt_link: Locator,
}

impl AdtPage {
    /// Create the page object
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            search: PatientSearchHelper::new(session.clone()),
            session,
            adt_link: Locator::css("ADT link", "a[href=\"#/ADTMain\"]"),
        }
    }

    /// Open the ADT module and run the shared patient search
    ///
    /// # Errors
    ///
    /// Propagates navigation, fixture, and search failures.
    pub async fn search_patient_in_adt(&self) -> MedResult<bool> {
        self.session.click(&self.adt_link).await?;
        self.session.wait_visible(&self.search.search_bar).await?;
        self.search.search_patient().await?;
        Ok(true)
    }
}
