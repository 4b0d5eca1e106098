//! Scenario runner.
//!
//! A [`Suite`] runs its scenarios strictly in declaration order against one
//! shared [`Session`]. Before each body the runner establishes the
//! scenario's [`Precondition`], so a scenario never depends on what the
//! previous one left behind.

use crate::pages::Pages;
use crate::result::{MedError, MedResult};
use crate::session::{ActionOutcome, Session};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Sign-in state a scenario needs before its body runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Precondition {
    /// Run in whatever state the page is in
    #[default]
    None,
    /// A user is signed in
    SignedIn,
    /// No user is signed in and the login form is shown
    SignedOut,
}

type ScenarioBody =
    Box<dyn for<'a> Fn(&'a ScenarioContext) -> BoxFuture<'a, MedResult<()>> + Send + Sync>;

/// One named test script
pub struct Scenario {
    name: String,
    precondition: Precondition,
    soft: bool,
    body: ScenarioBody,
}

impl Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("precondition", &self.precondition)
            .field("soft", &self.soft)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// Create a scenario
    #[must_use]
    pub fn new<F>(name: impl Into<String>, precondition: Precondition, body: F) -> Self
    where
        F: for<'a> Fn(&'a ScenarioContext) -> BoxFuture<'a, MedResult<()>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            precondition,
            soft: false,
            body: Box::new(body),
        }
    }

    /// Mark as using soft expectations: fail-fast does not stop on it
    #[must_use]
    pub const fn soft(mut self) -> Self {
        self.soft = true;
        self
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required sign-in state
    #[must_use]
    pub const fn precondition(&self) -> Precondition {
        self.precondition
    }

    /// Whether the scenario uses soft expectations
    #[must_use]
    pub const fn is_soft(&self) -> bool {
        self.soft
    }
}

/// What a scenario body sees: the session, the page objects, and expectations
#[derive(Debug)]
pub struct ScenarioContext {
    session: Session,
    pages: Pages,
    soft_failures: Mutex<Vec<String>>,
}

impl ScenarioContext {
    /// Build a context over `session`
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            pages: Pages::new(session),
            soft_failures: Mutex::new(Vec::new()),
        }
    }

    /// The session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Every page object
    #[must_use]
    pub const fn pages(&self) -> &Pages {
        &self.pages
    }

    /// Hard expectation: fails the scenario when `condition` is false
    ///
    /// # Errors
    ///
    /// Returns [`MedError::AssertionMismatch`] naming `what`.
    pub fn expect_true(&self, condition: bool, what: &str) -> MedResult<()> {
        if condition {
            Ok(())
        } else {
            Err(MedError::mismatch(format!("expected {what} to be true")))
        }
    }

    /// Hard expectation: fails the scenario when `actual != expected`
    ///
    /// # Errors
    ///
    /// Returns [`MedError::AssertionMismatch`] showing both values.
    pub fn expect_eq<T: PartialEq + Debug + ?Sized>(
        &self,
        actual: &T,
        expected: &T,
        what: &str,
    ) -> MedResult<()> {
        if actual == expected {
            Ok(())
        } else {
            Err(MedError::mismatch(format!(
                "{what}: expected {expected:?}, got {actual:?}"
            )))
        }
    }

    /// Soft expectation: records a failure and lets the body continue
    pub fn soft_expect_true(&self, condition: bool, what: &str) {
        if !condition {
            tracing::warn!(what, "soft expectation failed");
            self.soft_failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(format!("expected {what} to be true"));
        }
    }

    /// Boolean success flag of an action result
    #[must_use]
    pub fn flag<R: ActionOutcome>(&self, result: R, action: &str) -> bool {
        result.flag(action)
    }

    fn take_soft_failures(&self) -> Vec<String> {
        std::mem::take(
            &mut *self
                .soft_failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    async fn establish(&self, precondition: Precondition) -> MedResult<()> {
        let login = &self.pages.login;
        match precondition {
            Precondition::None => Ok(()),
            Precondition::SignedIn => {
                if login.is_signed_in().await? {
                    return Ok(());
                }
                login.navigate().await?;
                if login.perform_login().await? {
                    Ok(())
                } else {
                    Err(MedError::mismatch("could not sign in before scenario"))
                }
            }
            Precondition::SignedOut => {
                if login.is_signed_in().await? {
                    login.sign_out().await?;
                }
                if !self.session.is_visible(&login.login_button).await? {
                    login.navigate().await?;
                }
                self.session.wait_visible(&login.login_button).await
            }
        }
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Scenario name
    pub name: String,
    /// Whether the scenario passed
    pub passed: bool,
    /// Error message if failed
    pub error: Option<String>,
    /// Soft expectation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub soft_failures: Vec<String>,
    /// Scenario duration in milliseconds
    pub duration_ms: u64,
}

impl TestResult {
    /// Create a passing test result
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            soft_failures: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Create a failing test result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            soft_failures: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Set duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Results from running a suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Run identifier
    pub run_id: Uuid,
    /// Suite name
    pub suite_name: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Individual scenario results, in run order
    pub results: Vec<TestResult>,
    /// Scenarios not run because of fail-fast
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl SuiteResults {
    /// Check if all scenarios passed and none were skipped
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.skipped.is_empty() && self.results.iter().all(|r| r.passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    /// Find a result by scenario name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Serialize as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Json`] if serialization fails.
    pub fn to_json(&self) -> MedResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// An ordered list of scenarios with run options
#[derive(Debug, Default)]
pub struct Suite {
    name: String,
    scenarios: Vec<Scenario>,
    filter: Option<String>,
    fail_fast: bool,
}

impl Suite {
    /// Create an empty suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a scenario
    #[must_use]
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Run only scenarios whose name contains `filter` (case-insensitive)
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Stop after the first failing scenario that is not soft
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Suite name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scenario names in declaration order
    #[must_use]
    pub fn scenario_names(&self) -> Vec<&str> {
        self.scenarios.iter().map(Scenario::name).collect()
    }

    /// Names of the scenarios a run would execute, after the filter
    #[must_use]
    pub fn selected_names(&self) -> Vec<&str> {
        self.selected().map(Scenario::name).collect()
    }

    fn selected(&self) -> impl Iterator<Item = &Scenario> {
        let filter = self.filter.as_deref().map(str::to_lowercase);
        self.scenarios.iter().filter(move |s| {
            filter
                .as_deref()
                .map_or(true, |f| s.name.to_lowercase().contains(f))
        })
    }

    /// Run the selected scenarios in order
    pub async fn run(&self, session: &Session) -> SuiteResults {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();
        let timeout_ms = session.config().scenario_timeout_ms;
        tracing::info!(suite = %self.name, %run_id, "suite started");

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        let mut stopped = false;

        for scenario in self.selected() {
            if stopped {
                skipped.push(scenario.name.clone());
                continue;
            }

            let result = run_scenario(scenario, session, timeout_ms).await;
            if result.passed {
                tracing::info!(scenario = %result.name, duration_ms = result.duration_ms, "passed");
            } else {
                tracing::error!(
                    scenario = %result.name,
                    error = result.error.as_deref().unwrap_or_default(),
                    "failed"
                );
                if self.fail_fast && !scenario.soft {
                    stopped = true;
                }
            }
            results.push(result);
        }

        let results = SuiteResults {
            run_id,
            suite_name: self.name.clone(),
            started_at,
            results,
            skipped,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        tracing::info!(
            passed = results.passed_count(),
            failed = results.failed_count(),
            skipped = results.skipped.len(),
            "suite finished"
        );
        results
    }
}

async fn run_scenario(scenario: &Scenario, session: &Session, timeout_ms: u64) -> TestResult {
    let span = tracing::info_span!("scenario", name = %scenario.name);
    let start = Instant::now();
    let ctx = ScenarioContext::new(session);

    let body = async {
        ctx.establish(scenario.precondition).await?;
        (scenario.body)(&ctx).await
    };
    let outcome = tokio::time::timeout(Duration::from_millis(timeout_ms), body.instrument(span))
        .await
        .unwrap_or_else(|_| {
            Err(MedError::Timeout {
                what: format!("scenario {}", scenario.name),
                ms: timeout_ms,
            })
        });

    let soft_failures = ctx.take_soft_failures();
    let mut result = match outcome {
        Ok(()) if soft_failures.is_empty() => TestResult::pass(&scenario.name),
        Ok(()) => TestResult::fail(
            &scenario.name,
            format!("{} soft expectation(s) failed", soft_failures.len()),
        ),
        Err(e) => TestResult::fail(&scenario.name, error_chain(&e)),
    };
    result.soft_failures = soft_failures;
    result.with_duration(start.elapsed())
}

/// Error text followed by its causes
fn error_chain(err: &MedError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
