//! Reporters that format test events coming back from the browser.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Outcome of a single test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed { message: String },
    Pending,
}

/// A test result reported by one browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvent {
    /// Browser that ran the test.
    pub browser: String,
    /// Enclosing `describe` titles, outermost first.
    pub suite: Vec<String>,
    /// Test title.
    pub title: String,
    /// Result of the test.
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl TestEvent {
    /// Returns the suite path and title joined with `" > "`.
    pub fn full_title(&self) -> String {
        self.suite
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.title.as_str()))
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

/// Callable that formats one event into an output line.
pub type Reporter = Arc<dyn Fn(&TestEvent) -> String + Send + Sync>;

/// Which reporter a run registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// Human readable, one line per test.
    #[default]
    Spec,
    /// One JSON object per test.
    Json,
}

impl ReporterKind {
    /// Builds the reporter for this kind.
    pub fn reporter(self) -> Reporter {
        match self {
            ReporterKind::Spec => spec_reporter(),
            ReporterKind::Json => json_reporter(),
        }
    }
}

/// Formats events as `[browser] ✓ Suite > title (12ms)`.
pub fn spec_reporter() -> Reporter {
    Arc::new(|event: &TestEvent| {
        let title = event.full_title();
        match &event.outcome {
            Outcome::Passed => format!(
                "[{}] ✓ {} ({}ms)",
                event.browser, title, event.duration_ms
            ),
            Outcome::Failed { message } => format!(
                "[{}] ✗ {} ({}ms)\n    {}",
                event.browser, title, event.duration_ms, message
            ),
            Outcome::Pending => format!("[{}] - {}", event.browser, title),
        }
    })
}

/// Formats events as single-line JSON objects.
pub fn json_reporter() -> Reporter {
    Arc::new(|event: &TestEvent| {
        serde_json::to_string(event).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize test event");
            format!("{{\"error\":\"{}\"}}", e)
        })
    })
}
