//! Suite report
//!
//! Collects one [`CaseOutcome`] per executed case and summarizes the run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::CaseOutcome;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub outcomes: Vec<CaseOutcome>,
    /// Cases not executed because an earlier one failed under fail-fast
    pub skipped: usize,
    pub elapsed: Duration,
}

impl SuiteReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            dry_run,
            outcomes: Vec::new(),
            skipped: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn record(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// True when every executed case passed and none was skipped
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped == 0
    }

    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} passed, {} failed of {} case(s) in {:.2}s",
            self.passed(),
            self.failed(),
            self.total(),
            self.elapsed.as_secs_f64()
        );
        if self.skipped > 0 {
            line.push_str(&format!(" ({} skipped)", self.skipped));
        }
        line
    }

    /// Log one line per failure followed by the totals
    pub fn log_summary(&self) {
        let mode = if self.dry_run { "Dry run" } else { "Suite" };

        for outcome in self.failures() {
            tracing::error!("❌ {}: {}", outcome.name, outcome.verdict);
        }

        if self.is_success() {
            tracing::info!("🏁 {} {} succeeded: {}", mode, self.run_id, self.summary_line());
        } else {
            tracing::error!("🏁 {} {} failed: {}", mode, self.run_id, self.summary_line());
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
