//! A scripted page model of the hospital application.
//!
//! Reactions mirror what the real screens do closely enough for every page
//! object and scenario to run end to end without a browser.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use chrono::{Days, Local};
use medprobe::mock::{MockDriver, MockElement, MockPage, Trigger};
use medprobe::{default_data_file, BrowserDriver, Pages, Selector, Session, SuiteConfig};
use std::path::PathBuf;
use std::sync::Arc;

pub const BASE_URL: &str = "http://his.test";
pub const STAR_TOOLTIP: &str = "Mark As Favourite";
pub const SCAN_ALERT: &str = "Scan done details saved successfully";

/// Everyone registered in the application
pub const DIRECTORY: &[&str] = &[
    "Ram Bahadur Thapa",
    "Sita Kumari Sharma",
    "Hari Prasad Koirala",
    "Gita Thapa",
];

/// Workbook used by the integration tests of the fixture loader
pub fn fixtures_xlsx() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("fixtures.xlsx")
}

/// Workbook whose `PatientNames` table has a header and no data rows
pub fn empty_patients_xlsx() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("empty_patients.xlsx")
}

/// Fast timeouts for the mock
pub fn config() -> SuiteConfig {
    SuiteConfig::new()
        .with_base_url(BASE_URL)
        .with_data_file(default_data_file())
        .with_timeouts(300, 300, 10_000)
        .with_backoff(5, 25)
}

pub struct HospitalApp {
    pub driver: Arc<MockDriver>,
    pub session: Session,
    pub pages: Pages,
}

impl HospitalApp {
    pub fn new() -> Self {
        Self::with_config(config())
    }

    pub fn with_config(config: SuiteConfig) -> Self {
        let driver = Arc::new(MockDriver::new());
        let session = Session::new(Arc::clone(&driver) as Arc<dyn BrowserDriver>, config);
        let pages = Pages::new(&session);
        let app = Self {
            driver,
            session,
            pages,
        };
        app.wire_login();
        app.wire_search();
        app.wire_utilities();
        app.wire_dispensary();
        app.wire_procurement();
        app.wire_radiology();
        app.wire_laboratory();
        app
    }

    fn sel(locator: &medprobe::Locator) -> Selector {
        locator.selector().clone()
    }

    fn sidebar(&self) -> Vec<Selector> {
        let p = &self.pages;
        vec![
            Self::sel(&p.patient.patient_link),
            Self::sel(&p.appointment.appointment_link),
            Self::sel(&p.utilities.utilities_link),
            Self::sel(&p.dispensary.dispensary_link),
            Self::sel(&p.procurement.procurement_link),
            Self::sel(&p.radiology.radiology_link),
            Self::sel(&p.laboratory.laboratory_link),
            Self::sel(&p.adt.adt_link),
        ]
    }

    fn login_form(&self) -> Vec<Selector> {
        let login = &self.pages.login;
        vec![
            Self::sel(&login.username_input),
            Self::sel(&login.password_input),
            Self::sel(&login.login_button),
        ]
    }

    fn wire_login(&self) {
        let login = &self.pages.login;
        for selector in self.login_form() {
            self.driver.put(selector, MockElement::visible(""));
        }

        let form = self.login_form();
        let admin = Self::sel(&login.admin);
        self.driver.on(Trigger::Navigate, move |page| {
            if !page.is_shown(&admin) {
                for selector in &form {
                    page.show(selector.clone());
                }
            }
        });

        let user = Self::sel(&login.username_input);
        let pass = Self::sel(&login.password_input);
        let admin = Self::sel(&login.admin);
        let banner = Self::sel(&login.login_error_message);
        let form = self.login_form();
        let sidebar = self.sidebar();
        self.driver.on(Trigger::Click(Self::sel(&login.login_button)), move |page| {
            let valid = page.value_of(&user).as_deref() == Some("admin")
                && page.value_of(&pass).as_deref() == Some("pass123");
            if valid {
                page.remove(banner.clone());
                page.show(admin.clone());
                for selector in &sidebar {
                    page.show(selector.clone());
                }
                for selector in &form {
                    page.hide(selector.clone());
                }
            } else {
                page.put(banner.clone(), MockElement::visible("  Invalid credentials !  "));
            }
        });

        let log_out = Self::sel(&login.log_out);
        self.driver.on(Trigger::Click(Self::sel(&login.admin)), move |page| {
            page.show(log_out.clone());
        });

        let admin = Self::sel(&login.admin);
        let log_out = Self::sel(&login.log_out);
        let form = self.login_form();
        let sidebar = self.sidebar();
        self.driver.on(Trigger::Click(Self::sel(&login.log_out)), move |page| {
            page.hide(admin.clone());
            page.hide(log_out.clone());
            for selector in &sidebar {
                page.hide(selector.clone());
            }
            for selector in &form {
                page.put(selector.clone(), MockElement::visible(""));
            }
        });
    }

    fn wire_search(&self) {
        let search = &self.pages.patient;
        let bar = Self::sel(&search.search_bar);
        let first = Self::sel(&search.patient_name);
        let all = Self::sel(&self.pages.appointment.patient_names);

        for link in [
            Self::sel(&self.pages.patient.patient_link),
            Self::sel(&self.pages.appointment.appointment_link),
            Self::sel(&self.pages.adt.adt_link),
        ] {
            let (bar, first, all) = (bar.clone(), first.clone(), all.clone());
            self.driver.on(Trigger::Click(link), move |page| {
                page.put(bar.clone(), MockElement::visible(""));
                page.set_texts(first.clone(), &DIRECTORY[..1]);
                page.set_texts(all.clone(), DIRECTORY);
            });
        }

        let trigger = Trigger::Key(bar.clone(), "Enter".to_string());
        self.driver.on(trigger, move |page| {
            let term = page.value_of(&bar).unwrap_or_default().to_lowercase();
            let hits: Vec<&str> = DIRECTORY
                .iter()
                .copied()
                .filter(|name| name.to_lowercase().contains(term.trim()))
                .collect();
            page.set_texts(first.clone(), &hits[..hits.len().min(1)]);
            page.set_texts(all.clone(), &hits);
        });
    }

    fn wire_utilities(&self) {
        let utilities = &self.pages.utilities;
        let tab = Self::sel(&utilities.change_billing_counter_tab);
        self.driver.on(Trigger::Click(Self::sel(&utilities.utilities_link)), move |page| {
            page.show(tab.clone());
        });
        let counters = Self::sel(&utilities.counter_items);
        self.driver.on(
            Trigger::Click(Self::sel(&utilities.change_billing_counter_tab)),
            move |page| page.set_texts(counters.clone(), &["OPD Counter", "IPD Counter"]),
        );
    }

    fn wire_dispensary(&self) {
        let dispensary = &self.pages.dispensary;
        let first = Self::sel(&dispensary.first_counter);
        let counters = Self::sel(&dispensary.counter_items);
        let heading = Self::sel(&dispensary.page_heading);
        self.driver.on(Trigger::Click(Self::sel(&dispensary.dispensary_link)), move |page| {
            page.set_url(format!("{BASE_URL}/#/Dispensary"));
            page.put(first.clone(), MockElement::visible("Main Dispensary"));
            page.set_texts(counters.clone(), &["Main Dispensary", "Emergency Dispensary"]);
            page.put(heading.clone(), MockElement::visible("Dispensary"));
        });

        let message = Self::sel(&dispensary.active_counter_message);
        self.driver.on(Trigger::Click(Self::sel(&dispensary.first_counter)), move |page| {
            page.put(
                message.clone(),
                MockElement::visible("Activated Counter: Main Dispensary"),
            );
        });
    }

    fn wire_procurement(&self) {
        let procurement = &self.pages.procurement;
        let tab = Self::sel(&procurement.purchase_request_tab);
        self.driver.on(Trigger::Click(Self::sel(&procurement.procurement_link)), move |page| {
            page.show(tab.clone());
        });

        let today = Local::now().date_naive();
        let dates: Vec<String> = [0_u64, 2, 6]
            .iter()
            .map(|days| {
                today
                    .checked_sub_days(Days::new(*days))
                    .expect("date in range")
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .collect();

        let controls = [
            Self::sel(&procurement.ok_button),
            Self::sel(&procurement.create_button),
        ];
        let inputs = [Self::sel(&procurement.from_date), Self::sel(&procurement.to_date)];
        let select = Self::sel(&procurement.date_range_select);
        let cells = Self::sel(&procurement.request_date_cells);
        let notice = Self::sel(&procurement.notice_message);
        self.driver.on(
            Trigger::Click(Self::sel(&procurement.purchase_request_tab)),
            move |page| {
                for selector in &controls {
                    page.show(selector.clone());
                }
                for selector in &inputs {
                    page.put(selector.clone(), MockElement::visible(""));
                }
                page.put(
                    select.clone(),
                    MockElement::visible("").with_options(&[
                        "Today",
                        "Last 1 Week",
                        "Last 1 Month",
                        "Last 3 Months",
                    ]),
                );
                let texts: Vec<&str> = dates.iter().map(String::as_str).collect();
                page.set_texts(cells.clone(), &texts);
                page.remove(notice.clone());
            },
        );

        let from = Self::sel(&procurement.from_date);
        let to = Self::sel(&procurement.to_date);
        let notice = Self::sel(&procurement.notice_message);
        self.driver.on(Trigger::Click(Self::sel(&procurement.ok_button)), move |page| {
            let from = page.value_of(&from).unwrap_or_default();
            let to = page.value_of(&to).unwrap_or_default();
            if !from.is_empty() && !to.is_empty() && from > to {
                page.put(
                    notice.clone(),
                    MockElement::visible(" Date is not between Range. Please enter again "),
                );
            }
        });
    }

    fn wire_radiology(&self) {
        let radiology = &self.pages.radiology;
        let tab = Self::sel(&radiology.list_requests_tab);
        self.driver.on(Trigger::Click(Self::sel(&radiology.radiology_link)), move |page| {
            page.show(tab.clone());
        });
        let scan = Self::sel(&radiology.scan_done_button);
        self.driver.on(Trigger::Click(Self::sel(&radiology.list_requests_tab)), move |page| {
            page.show(scan.clone());
        });
        let done = Self::sel(&radiology.done_button);
        self.driver.on(Trigger::Click(Self::sel(&radiology.scan_done_button)), move |page| {
            page.show(done.clone());
        });
        self.driver.on(Trigger::Click(Self::sel(&radiology.done_button)), |page| {
            page.raise_dialog(SCAN_ALERT);
        });
    }

    fn wire_laboratory(&self) {
        let lab = &self.pages.laboratory;
        let settings = Self::sel(&lab.settings_tab);
        let star = Self::sel(&lab.star_icon);
        self.driver.on(Trigger::Click(Self::sel(&lab.laboratory_link)), move |page| {
            page.show(settings.clone());
            page.show(star.clone());
        });
        let add_new = Self::sel(&lab.add_new_lab_test);
        self.driver.on(Trigger::Click(Self::sel(&lab.settings_tab)), move |page| {
            page.show(add_new.clone());
        });
        let add = Self::sel(&lab.add_button);
        self.driver.on(Trigger::Click(Self::sel(&lab.add_new_lab_test)), move |page| {
            page.show(add.clone());
        });
        let error = Self::sel(&lab.error_message);
        self.driver.on(Trigger::Click(Self::sel(&lab.add_button)), move |page| {
            page.put(error.clone(), MockElement::visible("Lab Test Code Required."));
        });
        let tooltip = Self::sel(&lab.tooltip);
        self.driver.on(Trigger::Hover(Self::sel(&lab.star_icon)), move |page| {
            page.put(tooltip.clone(), MockElement::visible(STAR_TOOLTIP));
        });
    }

    /// Sign in through the page object
    pub async fn sign_in(&self) {
        self.pages.login.navigate().await.unwrap();
        assert!(self.pages.login.perform_login().await.unwrap());
    }

    /// Mutate the page model
    pub fn update(&self, f: impl FnOnce(&mut MockPage)) {
        self.driver.update(f);
    }
}
