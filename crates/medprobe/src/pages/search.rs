//! Quick-filter patient search shared by the patient, appointment, and ADT screens.

use crate::locator::Locator;
use crate::result::{MedError, MedResult};
use crate::session::Session;

/// Table of patient names used by searches
pub const PATIENT_NAMES_TABLE: &str = "PatientNames";

/// Column holding the full patient name
pub const FULL_NAME_COLUMN: &str = "Full Name";

/// Quick-filter search over the patient grid
#[derive(Debug, Clone)]
pub struct PatientSearchHelper {
    session: Session,
    /// Quick-filter input
    pub search_bar: Locator,
    /// `ShortName` cell of the first result row
    pub first_name_cell: Locator,
    /// `ShortName` cells of every result row
    pub name_cells: Locator,
}

impl PatientSearchHelper {
    /// Create the helper
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            search_bar: Locator::id("patient search bar", "quickFilterInput"),
            first_name_cell: Locator::xpath(
                "first patient name cell",
                "//div[@role='gridcell' and @col-id='ShortName'][1]",
            ),
            name_cells: Locator::xpath(
                "patient name cells",
                "//div[@role='gridcell' and @col-id='ShortName']",
            ),
        }
    }

    /// Search for the first name of the `PatientNames` table and verify the
    /// first result matches it.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::DataNotFound`] when no name is available, or
    /// [`MedError::AssertionMismatch`] when the first result differs.
    pub async fn search_patient(&self) -> MedResult<()> {
        let name = self
            .session
            .fixture_value(PATIENT_NAMES_TABLE, FULL_NAME_COLUMN)?;
        self.search_and_compare(&name).await
    }

    /// Type `term` into the quick filter and submit it
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Interaction`] or [`MedError::Timeout`] naming the search bar.
    pub async fn submit(&self, term: &str) -> MedResult<()> {
        self.session.fill(&self.search_bar, term).await?;
        self.session.press(&self.search_bar, "Enter").await
    }

    /// Submit `name` and wait for the first result to read exactly `name`
    ///
    /// # Errors
    ///
    /// Returns [`MedError::AssertionMismatch`] reporting the text actually
    /// shown when the first result does not match in time.
    pub async fn search_and_compare(&self, name: &str) -> MedResult<()> {
        self.submit(name).await?;
        self.expect_first_result(name).await
    }

    /// Wait for the first result to read exactly `name` (both trimmed)
    ///
    /// # Errors
    ///
    /// Returns [`MedError::AssertionMismatch`] when it does not in time.
    pub async fn expect_first_result(&self, name: &str) -> MedResult<()> {
        let expected = name.trim();
        let waited = self
            .session
            .action_waiter()
            .until_text_matches(self.session.driver(), &self.first_name_cell, |text| {
                text.trim() == expected
            })
            .await;

        match waited {
            Ok(_) => {
                tracing::debug!(name = expected, "search result matched");
                Ok(())
            }
            Err(MedError::Timeout { .. }) => {
                let shown = self
                    .session
                    .text_now(&self.first_name_cell)
                    .await
                    .ok()
                    .flatten()
                    .map(|t| t.trim().to_string());
                Err(MedError::mismatch(format!(
                    "expected first result {expected:?}, found {}",
                    shown.map_or_else(|| "no result".to_string(), |t| format!("{t:?}"))
                )))
            }
            Err(other) => Err(other),
        }
    }
}
