//! Console reporting of suite results

use console::{style, Color, Term};
use medprobe::{SuiteResults, TestResult};
use std::time::Duration;

/// Line-oriented reporter on stderr
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    fn prefix(&self, glyph: &str, plain: &str, color: Color) -> String {
        if self.use_color {
            style(glyph).fg(color).bold().to_string()
        } else {
            plain.to_string()
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("✓", "PASS", Color::Green);
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Failures print even in quiet mode
        let prefix = self.prefix("✗", "FAIL", Color::Red);
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("⚠", "WARN", Color::Yellow);
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print one scenario outcome
    pub fn scenario(&self, result: &TestResult) {
        let line = format!("{} ({}ms)", result.name, result.duration_ms);
        if result.passed {
            self.success(&line);
            return;
        }
        self.failure(&line);
        if let Some(error) = &result.error {
            let _ = self.term.write_line(&format!("    {error}"));
        }
        for soft in &result.soft_failures {
            let _ = self.term.write_line(&format!("    soft: {soft}"));
        }
    }

    /// Print every outcome and the totals line
    pub fn report(&self, results: &SuiteResults) {
        for result in &results.results {
            self.scenario(result);
        }
        for name in &results.skipped {
            self.warning(&format!("{name} skipped"));
        }
        if self.quiet && !results.all_passed() {
            return;
        }
        let _ = self.term.write_line(&summary_line(results));
    }
}

/// `passed, failed, skipped` totals with the run duration
#[must_use]
pub fn summary_line(results: &SuiteResults) -> String {
    format!(
        "{} passed, {} failed, {} skipped in {:.1}s",
        results.passed_count(),
        results.failed_count(),
        results.skipped.len(),
        Duration::from_millis(results.duration_ms).as_secs_f64()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let results: SuiteResults = serde_json::from_value(serde_json::json!({
            "run_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "suite_name": "hospital",
            "started_at": "2026-01-05T10:00:00Z",
            "results": [
                { "name": "TS-1", "passed": true, "error": null, "duration_ms": 1200 },
                { "name": "TS-2", "passed": false, "error": "boom", "duration_ms": 300 }
            ],
            "skipped": ["TS-3"],
            "duration_ms": 1500
        }))
        .unwrap();
        assert_eq!(summary_line(&results), "1 passed, 1 failed, 1 skipped in 1.5s");
    }

    #[test]
    fn test_reporter_flags() {
        let reporter = Reporter::new(false, true);
        assert!(!reporter.use_color);
        assert!(reporter.quiet);
    }
}
