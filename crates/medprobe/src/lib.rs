//! medprobe: browser end-to-end suite for a hospital-management web application
//!
//! Scenarios drive the application through page objects. Inputs and expected
//! values come from a spreadsheet workbook maintained by test-data authors.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    MEDPROBE Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenarios  │    │ Page       │    │ Browser    │            │
//! │   │ (Suite)    │───►│ Objects    │───►│ Driver     │            │
//! │   │            │    │ (Session)  │    │ (CDP/mock) │            │
//! │   └────────────┘    └─────┬──────┘    └────────────┘            │
//! │                           │                                      │
//! │             Fixtures ◄────┴────► Highlighter, Waits              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use medprobe::{hospital_suite, Session, SuiteConfig};
//!
//! let session = Session::launch(SuiteConfig::load("suite.yaml")?).await?;
//! let results = hospital_suite().run(&session).await;
//! assert!(results.all_passed());
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc, clippy::format_push_string)]
mod chromium;
mod config;
mod driver;
pub mod fixture;
mod highlight;
mod locator;
/// In-memory page model for driving page objects without a browser
pub mod mock;
/// Page objects for every screen the suite touches
pub mod pages;
mod result;
/// The hospital test scripts
pub mod scenarios;
mod session;
mod suite;
/// Condition waits with bounded backoff
pub mod wait;

#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
pub use config::{default_data_file, SuiteConfig, DEFAULT_BASE_URL};
pub use driver::{BrowserConfig, BrowserDriver, StyleMutation};
pub use fixture::{first_row, load_table, table_names, FixtureTable, RowRecord};
pub use highlight::{highlight, highlight_style, HIGHLIGHT_BACKGROUND, HIGHLIGHT_BORDER};
pub use locator::{js_literal, Locator, Selector};
pub use pages::Pages;
pub use result::{MedError, MedResult, LOGIN_MESSAGE_UNAVAILABLE};
pub use scenarios::hospital_suite;
pub use session::{ActionOutcome, Session};
pub use suite::{Precondition, Scenario, ScenarioContext, Suite, SuiteResults, TestResult};
pub use wait::{WaitOptions, WaitResult, Waiter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
