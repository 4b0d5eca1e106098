//! Page objects for the hospital-management application.
//!
//! Each screen is a struct holding the shared [`Session`] and the
//! [`Locator`](crate::Locator)s of the elements it touches. Locator fields
//! are public so test page models can be built against the same selectors.

mod adt;
mod appointment;
mod dispensary;
mod laboratory;
mod login;
mod patient;
mod procurement;
mod radiology;
mod search;
mod utilities;

pub use adt::AdtPage;
pub use appointment::AppointmentPage;
pub use dispensary::DispensaryPage;
pub use laboratory::{
    LaboratoryPage, LAB_NOTIFICATION_COLUMN, LAB_NOTIFICATION_TABLE, STAR_TOOLTIP_COLUMN,
    TOOLTIP_TABLE,
};
pub use login::{LoginPage, INVALID_LOGIN_TABLE, LOGIN_TABLE};
pub use patient::PatientPage;
pub use procurement::{check_dates_within, parse_request_date, DateRange, ProcurementPage};
pub use radiology::RadiologyPage;
pub use search::{PatientSearchHelper, FULL_NAME_COLUMN, PATIENT_NAMES_TABLE};
pub use utilities::UtilitiesPage;

use crate::session::Session;

/// Every page object of the application, built over one session
#[derive(Debug, Clone)]
pub struct Pages {
    /// Sign in / sign out
    pub login: LoginPage,
    /// Billing utilities
    pub utilities: UtilitiesPage,
    /// Appointment booking
    pub appointment: AppointmentPage,
    /// Pharmacy dispensary
    pub dispensary: DispensaryPage,
    /// Procurement
    pub procurement: ProcurementPage,
    /// Patient registration
    pub patient: PatientPage,
    /// Admission, discharge, transfer
    pub adt: AdtPage,
    /// Radiology
    pub radiology: RadiologyPage,
    /// Laboratory
    pub laboratory: LaboratoryPage,
}

impl Pages {
    /// Build every page object over `session`
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            login: LoginPage::new(session.clone()),
            utilities: UtilitiesPage::new(session.clone()),
            appointment: AppointmentPage::new(session.clone()),
            dispensary: DispensaryPage::new(session.clone()),
            procurement: ProcurementPage::new(session.clone()),
            patient: PatientPage::new(session.clone()),
            adt: AdtPage::new(session.clone()),
            radiology: RadiologyPage::new(session.clone()),
            laboratory: LaboratoryPage::new(session.clone()),
        }
    }
}
