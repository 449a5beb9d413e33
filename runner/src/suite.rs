//! Suite discovery and execution
//!
//! Cases run one after another against a single adapter set. Adapters are
//! closed once, after the last case, whether the suite passed or not.

use engine::{
    CaseSource, DocumentStore, EngineError, MessageChannel, RelationalStore, TestCase, TestCaseDriver, ValueSource,
    preview,
};
use shared::{CaseOutcome, FailurePhase, Verdict, case_info, case_warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RunnerConfig;
use crate::error::{RunnerError, RunnerResult};
use crate::report::SuiteReport;

/// Expand files and directories into descriptor paths
///
/// A file is taken as given. A directory contributes its own `*.json` files,
/// sorted by name; subdirectories are not searched, so templates can live
/// beside descriptors in a nested folder.
pub async fn discover_cases(paths: &[PathBuf]) -> RunnerResult<Vec<PathBuf>> {
    let mut cases = Vec::new();

    for path in paths {
        let discovery = |source| RunnerError::Discovery {
            path: path.clone(),
            source,
        };

        let metadata = tokio::fs::metadata(path).await.map_err(discovery)?;
        if metadata.is_file() {
            cases.push(path.clone());
            continue;
        }

        let mut entries = tokio::fs::read_dir(path).await.map_err(discovery)?;

        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(discovery)? {
            let candidate = entry.path();
            let is_file = tokio::fs::metadata(&candidate).await.is_ok_and(|meta| meta.is_file());
            if is_file && candidate.extension().is_some_and(|ext| ext == "json") {
                found.push(candidate);
            }
        }
        found.sort();

        tracing::debug!("📂 {} descriptor(s) in {}", found.len(), path.display());
        cases.extend(found);
    }

    if cases.is_empty() {
        return Err(RunnerError::NoCases { paths: paths.to_vec() });
    }
    Ok(cases)
}

/// Outcome for a case whose descriptor or templates could not be loaded
fn load_failure(path: &Path, error: EngineError) -> CaseOutcome {
    let name = path.display().to_string();
    case_warn!(name, "⚠️ Could not load case: {}", error);

    CaseOutcome {
        name,
        verdict: Verdict::fail(FailurePhase::Render, error.to_string()),
        elapsed: Duration::ZERO,
    }
}

/// Runs every discovered case through one [`TestCaseDriver`]
pub struct SuiteRunner<'a, S: ?Sized, C: ?Sized, R: ?Sized, D: ?Sized> {
    source: &'a S,
    channel: &'a C,
    relational: &'a R,
    documents: &'a D,
    config: RunnerConfig,
    values: Option<Arc<dyn ValueSource>>,
}

impl<'a, S, C, R, D> SuiteRunner<'a, S, C, R, D>
where
    S: CaseSource + ?Sized,
    C: MessageChannel + ?Sized,
    R: RelationalStore + ?Sized,
    D: DocumentStore + ?Sized,
{
    pub fn new(source: &'a S, channel: &'a C, relational: &'a R, documents: &'a D, config: RunnerConfig) -> Self {
        Self {
            source,
            channel,
            relational,
            documents,
            config,
            values: None,
        }
    }

    /// Replace the generator of per-run identifiers and timestamps
    pub fn with_value_source(mut self, values: Arc<dyn ValueSource>) -> Self {
        self.values = Some(values);
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run the suite, then close the adapters
    pub async fn run(&self) -> RunnerResult<SuiteReport> {
        let paths = discover_cases(&self.config.case_paths).await?;
        let started = Instant::now();
        let mut report = SuiteReport::new(false);

        tracing::info!("🧪 Running {} case(s), run {}", paths.len(), report.run_id);

        let mut driver = TestCaseDriver::new(
            self.channel,
            self.relational,
            self.documents,
            self.config.engine.clone(),
        );
        if let Some(values) = &self.values {
            driver = driver.with_value_source(values.clone());
        }

        for (index, path) in paths.iter().enumerate() {
            let outcome = match TestCase::load(self.source, path).await {
                Ok(case) => driver.run(&case).await,
                Err(e) => load_failure(path, e),
            };

            let failed = !outcome.passed();
            report.record(outcome);

            if failed && self.config.fail_fast {
                report.skipped = paths.len() - index - 1;
                if report.skipped > 0 {
                    tracing::warn!("⏹️ Fail-fast: skipping {} remaining case(s)", report.skipped);
                }
                break;
            }
        }

        self.close_adapters().await;

        report.finish(started.elapsed());
        report.log_summary();
        Ok(report)
    }

    /// Close every adapter once; failures are logged, not returned
    async fn close_adapters(&self) {
        if let Err(e) = self.channel.close().await {
            tracing::warn!("⚠️ Failed to close message channel: {}", e);
        }
        if let Err(e) = self.relational.close().await {
            tracing::warn!("⚠️ Failed to close relational store: {}", e);
        }
        if let Err(e) = self.documents.close().await {
            tracing::warn!("⚠️ Failed to close document store: {}", e);
        }
        tracing::debug!("🔌 Adapters closed");
    }
}

/// Load and render every case without contacting any adapter
pub async fn dry_run<S>(config: &RunnerConfig, source: &S, values: &dyn ValueSource) -> RunnerResult<SuiteReport>
where
    S: CaseSource + ?Sized,
{
    let paths = discover_cases(&config.case_paths).await?;
    let started = Instant::now();
    let mut report = SuiteReport::new(true);

    tracing::info!("🔍 Dry run over {} case(s)", paths.len());

    for path in &paths {
        let case_started = Instant::now();
        let case = match TestCase::load(source, path).await {
            Ok(case) => case,
            Err(e) => {
                report.record(load_failure(path, e));
                continue;
            }
        };

        let verdict = match preview(&case, &config.engine, values) {
            Ok(preview) => {
                let name = case.name();
                case_info!(
                    name,
                    "📨 {} <- {}",
                    case.descriptor.messaging.input_channel,
                    preview.rendered.request
                );
                case_info!(name, "📬 expect {}", preview.rendered.expected_response);
                for (group, request) in &preview.store_requests {
                    case_info!(name, "🗄️ {}: {}", group, request);
                }
                Verdict::Pass
            }
            Err(e) => {
                case_warn!(case.name(), "⚠️ Render failed: {}", e);
                Verdict::fail(FailurePhase::Render, e.to_string())
            }
        };

        report.record(CaseOutcome {
            name: case.name().to_string(),
            verdict,
            elapsed: case_started.elapsed(),
        });
    }

    report.finish(started.elapsed());
    report.log_summary();
    Ok(report)
}
