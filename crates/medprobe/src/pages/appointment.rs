//! Appointment booking screen.

use super::search::{PatientSearchHelper, FULL_NAME_COLUMN, PATIENT_NAMES_TABLE};
use crate::locator::Locator;
use crate::result::{MedError, MedResult};
use crate::session::Session;

/// Appointment patient list
#[derive(Debug, Clone)]
pub struct AppointmentPage {
    session: Session,
    search: PatientSearchHelper,
    /// Sidebar link to the appointment module
    pub appointment_link: Locator,
    /// Quick-filter input
    pub search_bar: Locator,
    /// `ShortName` cell of the first row
    pub first_patient_name: Locator,
    /// `ShortName` cells of every row
    pub patient_names: Locator,
}

impl AppointmentPage {
    /// Create the page object
    #[must_use]
    pub fn new(session: Session) -> Self {
        let search = PatientSearchHelper::new(session.clone());
        Self {
            search_bar: search.search_bar.clone(),
            first_patient_name: search.first_name_cell.clone(),
            patient_names: search.name_cells.clone(),
            session,
            search,
            appointment_link: Locator::css("appointment link", "a[href=\"#/Appointment\"]"),
        }
    }

    /// Open the appointment module and wait for its search bar
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Interaction`] or [`MedError::Timeout`] naming the
    /// element that could not be used.
    pub async fn navigate_to_appointment_page(&self) -> MedResult<()> {
        self.session.click(&self.appointment_link).await?;
        self.session.wait_visible(&self.search_bar).await
    }

    /// Name shown in the first row of the patient list
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] when the list stays empty.
    pub async fn select_first_patient(&self) -> MedResult<String> {
        let name = self.session.text(&self.first_patient_name).await?;
        tracing::debug!(%name, "first listed patient");
        Ok(name)
    }

    /// Submit `name` in the quick filter
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Interaction`] naming the search bar.
    pub async fn search_patient(&self, name: &str) -> MedResult<()> {
        self.search.submit(name).await
    }

    /// Verify the first result reads `name`
    ///
    /// # Errors
    ///
    /// Returns [`MedError::AssertionMismatch`] when it does not.
    pub async fn verify_patient_name(&self, name: &str) -> MedResult<()> {
        self.search.expect_first_result(name).await
    }

    /// Keyword-driven search: open, search the first `PatientNames` entry,
    /// verify the first result.
    ///
    /// # Errors
    ///
    /// Propagates navigation, fixture, and verification failures.
    pub async fn search_and_verify_patient(&self) -> MedResult<bool> {
        let name = self
            .session
            .fixture_value(PATIENT_NAMES_TABLE, FULL_NAME_COLUMN)?;
        self.navigate_to_appointment_page().await?;
        self.search_patient(&name).await?;
        self.verify_patient_name(&name).await?;
        Ok(true)
    }

    /// Open the appointment module and run the shared patient search
    ///
    /// # Errors
    ///
    /// Propagates navigation, fixture, and search failures.
    pub async fn search_patient_in_appointment(&self) -> MedResult<bool> {
        self.navigate_to_appointment_page().await?;
        self.search.search_patient().await?;
        Ok(true)
    }

    /// Search the first `PatientNames` entry and verify that every listed row
    /// contains the search term (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`MedError::AssertionMismatch`] listing the rows that do not
    /// contain the term, or [`MedError::Timeout`] when no row is listed.
    pub async fn search_and_verify_patient_list(&self) -> MedResult<bool> {
        let term = self
            .session
            .fixture_value(PATIENT_NAMES_TABLE, FULL_NAME_COLUMN)?;
        self.navigate_to_appointment_page().await?;
        self.search_patient(&term).await?;
        self.verify_patient_name(&term).await?;

        let names = self.session.texts(&self.patient_names).await?;
        let needle = term.trim().to_lowercase();
        let stray: Vec<&String> = names
            .iter()
            .filter(|name| !name.to_lowercase().contains(&needle))
            .collect();
        if !stray.is_empty() {
            return Err(MedError::mismatch(format!(
                "rows not matching {term:?}: {stray:?}"
            )));
        }

        tracing::info!(rows = names.len(), %term, "appointment list filtered");
        Ok(true)
    }
}
