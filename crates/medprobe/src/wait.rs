//! Condition waits.
//!
//! Every wait polls a readiness condition until it holds or the timeout
//! elapses. The interval starts at `poll_initial_ms` and doubles after each
//! miss, never exceeding `poll_max_ms`. Interaction errors raised by a check
//! (element detached mid-render, not yet attached) count as "not ready yet";
//! any other error ends the wait immediately.

use crate::driver::BrowserDriver;
use crate::locator::Locator;
use crate::result::{MedError, MedResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for visibility waits (20 seconds)
pub const DEFAULT_VISIBLE_TIMEOUT_MS: u64 = 20_000;

/// Default first polling interval (50ms)
pub const DEFAULT_POLL_INITIAL_MS: u64 = 50;

/// Default polling interval cap (500ms)
pub const DEFAULT_POLL_MAX_MS: u64 = 500;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// First polling interval in milliseconds
    pub poll_initial_ms: u64,
    /// Largest polling interval in milliseconds
    pub poll_max_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_VISIBLE_TIMEOUT_MS,
            poll_initial_ms: DEFAULT_POLL_INITIAL_MS,
            poll_max_ms: DEFAULT_POLL_MAX_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the backoff bounds in milliseconds
    #[must_use]
    pub const fn with_backoff(mut self, initial_ms: u64, max_ms: u64) -> Self {
        self.poll_initial_ms = initial_ms;
        self.poll_max_ms = max_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Polling interval before attempt `attempt` (0-based)
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let max = self.poll_max_ms.max(1);
        let initial = self.poll_initial_ms.clamp(1, max);
        let factor = 1_u64.checked_shl(attempt.min(63)).unwrap_or(u64::MAX);
        Duration::from_millis(initial.saturating_mul(factor).min(max))
    }
}

/// Outcome of a successful wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult<T> {
    /// Value produced by the condition
    pub value: T,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of checks made
    pub attempts: u32,
}

// =============================================================================
// WAITER IMPLEMENTATION
// =============================================================================

/// Polls conditions with bounded exponential backoff
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a new waiter with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom options
    #[must_use]
    pub const fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Same backoff, different timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.options.timeout_ms = timeout_ms;
        self
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Poll `check` until it yields a value.
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] naming `what` when no value arrives in
    /// time, or the first non-interaction error `check` returns.
    pub async fn poll<T, F, Fut>(&self, what: &str, mut check: F) -> MedResult<WaitResult<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = MedResult<Option<T>>>,
    {
        let start = Instant::now();
        let deadline = start + self.options.timeout();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match check().await {
                Ok(Some(value)) => {
                    return Ok(WaitResult {
                        value,
                        elapsed: start.elapsed(),
                        attempts: attempt,
                    })
                }
                Ok(None) => {}
                Err(e) if e.is_interaction() => {
                    tracing::trace!(what, error = %e, "condition not ready");
                }
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(what, attempts = attempt, "wait timed out");
                return Err(MedError::Timeout {
                    what: what.to_string(),
                    ms: self.options.timeout_ms,
                });
            }
            let delay = self.options.delay_for(attempt - 1).min(deadline - now);
            tokio::time::sleep(delay).await;
        }
    }

    /// Poll a boolean condition until it holds
    ///
    /// # Errors
    ///
    /// Same as [`Waiter::poll`].
    pub async fn until<F, Fut>(&self, what: &str, mut check: F) -> MedResult<Duration>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = MedResult<bool>>,
    {
        let result = self
            .poll(what, || {
                let fut = check();
                async move { fut.await.map(|ok| ok.then_some(())) }
            })
            .await?;
        Ok(result.elapsed)
    }

    /// Wait until the locator's first match is visible
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] naming the locator.
    pub async fn until_visible(
        &self,
        driver: &dyn BrowserDriver,
        locator: &Locator,
    ) -> MedResult<()> {
        let selector = locator.selector();
        self.until(&format!("{} to be visible", locator.name()), move || async move {
            driver.is_visible(selector).await
        })
        .await?;
        Ok(())
    }

    /// Wait until the locator's first match is hidden or gone
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] naming the locator.
    pub async fn until_hidden(
        &self,
        driver: &dyn BrowserDriver,
        locator: &Locator,
    ) -> MedResult<()> {
        let selector = locator.selector();
        self.until(&format!("{} to be hidden", locator.name()), move || async move {
            driver.is_visible(selector).await.map(|visible| !visible)
        })
        .await?;
        Ok(())
    }

    /// Wait until the first match is visible with non-blank text, returning it
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] naming the locator.
    pub async fn until_text(
        &self,
        driver: &dyn BrowserDriver,
        locator: &Locator,
    ) -> MedResult<String> {
        self.until_text_matches(driver, locator, |text| !text.trim().is_empty())
            .await
    }

    /// Wait until the first match is visible and its text satisfies `accept`
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] naming the locator.
    pub async fn until_text_matches<P>(
        &self,
        driver: &dyn BrowserDriver,
        locator: &Locator,
        accept: P,
    ) -> MedResult<String>
    where
        P: Fn(&str) -> bool,
    {
        let selector = locator.selector();
        let accept = &accept;
        let result = self
            .poll(&format!("text of {}", locator.name()), move || async move {
                if !driver.is_visible(selector).await? {
                    return Ok(None);
                }
                let text = driver.inner_text(selector).await?;
                Ok(accept(&text).then_some(text))
            })
            .await?;
        Ok(result.value)
    }

    /// Wait until at least `min` elements match, returning the count
    ///
    /// # Errors
    ///
    /// Returns [`MedError::Timeout`] naming the locator.
    pub async fn until_count_at_least(
        &self,
        driver: &dyn BrowserDriver,
        locator: &Locator,
        min: usize,
    ) -> MedResult<usize> {
        let selector = locator.selector();
        let result = self
            .poll(&format!("{} to list {min} entries", locator.name()), move || async move {
                let count = driver.count(selector).await?;
                Ok((count >= min).then_some(count))
            })
            .await?;
        Ok(result.value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick() -> Waiter {
        Waiter::with_options(WaitOptions::new().with_timeout(200).with_backoff(5, 20))
    }

    mod backoff_tests {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn test_delays_double_then_cap() {
            let options = WaitOptions::new();
            let delays: Vec<u64> = (0..6)
                .map(|n| u64::try_from(options.delay_for(n).as_millis()).unwrap())
                .collect();
            assert_eq!(delays, vec![50, 100, 200, 400, 500, 500]);
        }

        #[test]
        fn test_initial_above_max_is_clamped() {
            let options = WaitOptions::new().with_backoff(900, 100);
            assert_eq!(options.delay_for(0), Duration::from_millis(100));
        }

        proptest! {
            #[test]
            fn prop_delay_bounded(initial in 0u64..10_000, max in 0u64..10_000, attempt in 0u32..200) {
                let options = WaitOptions::new().with_backoff(initial, max);
                let delay = options.delay_for(attempt);
                prop_assert!(delay <= Duration::from_millis(max.max(1)));
                prop_assert!(delay >= Duration::from_millis(1));
            }

            #[test]
            fn prop_delay_monotonic(initial in 1u64..1_000, max in 1u64..5_000, attempt in 0u32..100) {
                let options = WaitOptions::new().with_backoff(initial, max);
                prop_assert!(options.delay_for(attempt) <= options.delay_for(attempt + 1));
            }
        }
    }

    mod poll_tests {
        use super::*;

        #[tokio::test]
        async fn test_until_succeeds_after_retries() {
            let calls = AtomicU32::new(0);
            let calls = &calls;
            quick()
                .until("third call", move || async move {
                    Ok(calls.fetch_add(1, Ordering::SeqCst) >= 2)
                })
                .await
                .unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_until_times_out() {
            let err = quick()
                .until("never", || async { Ok(false) })
                .await
                .unwrap_err();
            match err {
                MedError::Timeout { what, ms } => {
                    assert_eq!(what, "never");
                    assert_eq!(ms, 200);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_interaction_errors_are_retried() {
            let calls = AtomicU32::new(0);
            let calls = &calls;
            quick()
                .until("attached", move || async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(MedError::interaction("grid", "detached"))
                    } else {
                        Ok(true)
                    }
                })
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_other_errors_stop_the_wait() {
            let err = quick()
                .until("config", || async { Err(MedError::mismatch("boom")) })
                .await
                .unwrap_err();
            assert!(matches!(err, MedError::AssertionMismatch { .. }));
        }
    }

    mod driver_wait_tests {
        use super::*;

        #[tokio::test]
        async fn test_until_visible_on_mock() {
            let driver = MockDriver::new();
            let admin = Locator::xpath("admin menu", "//li[@class=\"dropdown dropdown-user\"]");
            driver.put(&admin, MockElement::visible(""));
            quick().until_visible(&driver, &admin).await.unwrap();
        }

        #[tokio::test]
        async fn test_until_visible_times_out_with_locator_name() {
            let driver = MockDriver::new();
            let admin = Locator::id("admin menu", "admin");
            driver.put(&admin, MockElement::hidden());
            let err = quick().until_visible(&driver, &admin).await.unwrap_err();
            assert!(err.to_string().contains("admin menu"));
            assert!(err.is_interaction());
        }

        #[tokio::test]
        async fn test_until_text_returns_text() {
            let driver = MockDriver::new();
            let cell = Locator::css("first name cell", "div[col-id='ShortName']");
            driver.put(&cell, MockElement::visible("Ram Bahadur"));
            let text = quick().until_text(&driver, &cell).await.unwrap();
            assert_eq!(text, "Ram Bahadur");
        }

        #[tokio::test]
        async fn test_until_count_at_least() {
            let driver = MockDriver::new();
            let rows = Locator::css("rows", "div[role='row']");
            driver.put_all(&rows, vec![MockElement::visible("a"), MockElement::visible("b")]);
            assert_eq!(quick().until_count_at_least(&driver, &rows, 2).await.unwrap(), 2);
            assert!(quick().until_count_at_least(&driver, &rows, 3).await.is_err());
        }
    }
}
