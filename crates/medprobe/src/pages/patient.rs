//! Patient registration screen.

use super::search::{PatientSearchHelper, FULL_NAME_COLUMN, PATIENT_NAMES_TABLE};
use crate::locator::Locator;
use crate::result::MedResult;
use crate::session::Session;

/// Patient list with its quick filter
#[derive(Debug, Clone)]
pub struct PatientPage {
    session: Session,
    search: PatientSearchHelper,
    /// Sidebar link to the patient module
    pub patient_link: Locator,
    /// Quick-filter input
    pub search_bar: Locator,
    /// Hospital-number search input
    pub hospital_search_bar: Locator,
    /// `ShortName` cell of the first row
    pub patient_name: Locator,
    /// `PatientCode` cell of the first row
    pub patient_code: Locator,
}

impl PatientPage {
    /// Create the page object
    #[must_use]
    pub fn new(session: Session) -> Self {
        let search = PatientSearchHelper::new(session.clone());
        Self {
            search_bar: search.search_bar.clone(),
            patient_name: search.first_name_cell.clone(),
            session,
            search,
            patient_link: Locator::css("patient link", "a[href=\"#/Patient\"]"),
            hospital_search_bar: Locator::id(
                "hospital number search bar",
                "id_input_search_using_hospital_no",
            ),
            patient_code: Locator::xpath(
                "first patient code cell",
                "//div[@role='gridcell' and @col-id='PatientCode'][1]",
            ),
        }
    }

    async fn open(&self) -> MedResult<()> {
        self.session.click(&self.patient_link).await?;
        self.session.wait_visible(&self.search_bar).await
    }

    /// Open the patient module and run the shared patient search
    ///
    /// # Errors
    ///
    /// Propagates navigation, fixture, and search failures.
    pub async fn search_patient_in_patient_page(&self) -> MedResult<bool> {
        self.open().await?;
        self.search.search_patient().await?;
        Ok(true)
    }

    /// Search every name of the `PatientNames` table and verify each first
    /// result matches it exactly. A table without data rows verifies as true.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MedError::AssertionMismatch`] for the first name whose
    /// result differs, or [`crate::MedError::DataNotFound`] for a row without a name.
    pub async fn search_and_verify_patients(&self) -> MedResult<bool> {
        self.open().await?;

        let patients = self
            .session
            .fixture(PATIENT_NAMES_TABLE, &[FULL_NAME_COLUMN])?;
        for patient in &patients {
            let name = patient.require(FULL_NAME_COLUMN)?;
            self.search.submit(name).await?;
            self.search.expect_first_result(name).await?;
            self.session.clear(&self.search_bar).await?;
        }

        tracing::info!(count = patients.len(), "verified patient searches");
        Ok(true)
    }
}
