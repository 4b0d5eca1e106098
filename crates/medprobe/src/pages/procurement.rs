//! Procurement purchase-request list.

use crate::locator::Locator;
use crate::result::{MedError, MedResult};
use crate::session::Session;
use chrono::{Days, Local, NaiveDate, NaiveDateTime};

/// From-date entered by the invalid-filter check (after the to-date)
const INVALID_FROM_DATE: &str = "2030-12-31";

/// To-date entered by the invalid-filter check
const INVALID_TO_DATE: &str = "2020-01-01";

/// Date-range options of the purchase-request filter dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    /// Today only
    Today,
    /// Last seven days
    #[default]
    LastWeek,
    /// Last thirty days
    LastMonth,
    /// Last ninety days
    LastThreeMonths,
}

impl DateRange {
    /// Label shown in the dropdown
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::LastWeek => "Last 1 Week",
            Self::LastMonth => "Last 1 Month",
            Self::LastThreeMonths => "Last 3 Months",
        }
    }

    /// Days covered before `today`
    #[must_use]
    pub const fn days(self) -> u64 {
        match self {
            Self::Today => 0,
            Self::LastWeek => 7,
            Self::LastMonth => 30,
            Self::LastThreeMonths => 90,
        }
    }

    /// Inclusive bounds ending at `today`
    #[must_use]
    pub fn bounds(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let from = today.checked_sub_days(Days::new(self.days())).unwrap_or(NaiveDate::MIN);
        (from, today)
    }
}

/// Purchase request list and its filters
#[derive(Debug, Clone)]
pub struct ProcurementPage {
    session: Session,
    /// Sidebar link to the procurement module
    pub procurement_link: Locator,
    /// Purchase request tab
    pub purchase_request_tab: Locator,
    /// From-date filter input
    pub from_date: Locator,
    /// To-date filter input
    pub to_date: Locator,
    /// Filter apply button
    pub ok_button: Locator,
    /// Date-range dropdown
    pub date_range_select: Locator,
    /// Create purchase request button
    pub create_button: Locator,
    /// Notification shown for rejected filters
    pub notice_message: Locator,
    /// `RequestDate` cells of every row
    pub request_date_cells: Locator,
}

impl ProcurementPage {
    /// Create the page object
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            procurement_link: Locator::css("procurement link", "a[href=\"#/ProcurementMain\"]"),
            purchase_request_tab: Locator::css(
                "purchase request tab",
                "a[href=\"#/ProcurementMain/PurchaseRequest\"]",
            ),
            from_date: Locator::css("from date filter", "#date-from input"),
            to_date: Locator::css("to date filter", "#date-to input"),
            ok_button: Locator::xpath("filter OK button", "//button[contains(text(),'OK')]"),
            date_range_select: Locator::css("date range dropdown", "select.date-range"),
            create_button: Locator::xpath(
                "create purchase request button",
                "//button[contains(text(),'Create Purchase Request')]",
            ),
            notice_message: Locator::css("notice message", "p.main-message"),
            request_date_cells: Locator::xpath(
                "request date cells",
                "//div[@role='gridcell' and @col-id='RequestDate']",
            ),
        }
    }

    async fn open(&self) -> MedResult<()> {
        self.session.click(&self.procurement_link).await?;
        self.session.click(&self.purchase_request_tab).await
    }

    /// Open the purchase request list and verify its filter and action
    /// controls are all shown.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] naming the first control that never appears.
    pub async fn verify_purchase_request_list_elements(&self) -> MedResult<bool> {
        self.open().await?;
        for control in [
            &self.from_date,
            &self.to_date,
            &self.ok_button,
            &self.date_range_select,
            &self.create_button,
        ] {
            self.session.wait_visible(control).await?;
        }
        Ok(true)
    }

    /// Apply a from-date later than the to-date and return the trimmed
    /// notice the application shows.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] when no notice appears.
    pub async fn verify_notice_message_after_entering_incorrect_filters(
        &self,
    ) -> MedResult<String> {
        self.open().await?;
        self.session.fill(&self.from_date, INVALID_FROM_DATE).await?;
        self.session.fill(&self.to_date, INVALID_TO_DATE).await?;
        self.session.click(&self.ok_button).await?;

        let notice = self.session.text(&self.notice_message).await?;
        tracing::info!(%notice, "filter notice displayed");
        Ok(notice)
    }

    /// Choose "Last 1 Week" and verify every listed request date lies within it
    ///
    /// # Errors
    ///
    /// Returns [`MedError::AssertionMismatch`] for a date outside the range
    /// or a cell that is not a date.
    pub async fn verify_requested_date_column_date_within_range(&self) -> MedResult<bool> {
        self.verify_request_dates(DateRange::default(), Local::now().date_naive())
            .await
    }

    /// Choose `range` in the dropdown and verify every listed request date
    /// lies between `range`'s start and `today`.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::AssertionMismatch`] for a date outside the range
    /// or a cell that is not a date.
    pub async fn verify_request_dates(
        &self,
        range: DateRange,
        today: NaiveDate,
    ) -> MedResult<bool> {
        self.open().await?;
        self.session.select(&self.date_range_select, range.label()).await?;
        self.session.click(&self.ok_button).await?;

        let cells = self.session.texts(&self.request_date_cells).await?;
        let (from, to) = range.bounds(today);
        check_dates_within(&cells, from, to)?;

        tracing::info!(rows = cells.len(), range = range.label(), "request dates within range");
        Ok(true)
    }
}

/// Parse a request-date cell
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time, and `DD-MM-YYYY`.
#[must_use]
pub fn parse_request_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(text, "%d-%m-%Y").ok())
}

/// Verify every cell is a date within `from..=to`
///
/// # Errors
///
/// Returns [`MedError::AssertionMismatch`] naming the first offending cell.
pub fn check_dates_within(cells: &[String], from: NaiveDate, to: NaiveDate) -> MedResult<()> {
    for cell in cells {
        let date = parse_request_date(cell)
            .ok_or_else(|| MedError::mismatch(format!("request date {cell:?} is not a date")))?;
        if date < from || date > to {
            return Err(MedError::mismatch(format!(
                "request date {date} is outside {from}..={to}"
            )));
        }
    }
    Ok(())
}
