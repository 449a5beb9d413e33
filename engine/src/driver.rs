//! Test case driver
//!
//! Runs one case through its phases in order: build payload, render,
//! exchange, compare, then verify each store group sequentially. The first
//! failing phase ends the case. The driver borrows its adapters and keeps no
//! mutable state, so one driver can run many cases, including concurrently.

use serde_json::Value;
use shared::{
    CaseOutcome, FailurePhase, Payload, StoreTarget, Verdict, case_debug, case_info, logging,
};
use std::sync::Arc;
use std::time::Instant;

use crate::case::TestCase;
use crate::config::EngineConfig;
use crate::core::{StoreVerifier, SystemValueSource, exchange, render_document, render_value, render_with_policy, scrub};
use crate::error::{EngineError, EngineResult};
use crate::traits::{DocumentStore, MessageChannel, RelationalStore, ValueSource};

/// Concrete documents produced for one execution
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCase {
    pub payload: Payload,
    pub request: Value,
    pub expected_response: Value,
}

/// Everything a case would send, rendered without touching any adapter
#[derive(Debug, Clone, PartialEq)]
pub struct CasePreview {
    pub rendered: RenderedCase,
    /// Group name and its rendered query or filter text
    pub store_requests: Vec<(String, String)>,
}

/// Render request and expected response for a payload
pub fn render_case(case: &TestCase, payload: Payload, config: &EngineConfig) -> EngineResult<RenderedCase> {
    let request = render_document(
        &case.request_template,
        &payload,
        config.placeholder_policy,
        "request template",
    )?;
    let expected_response = render_document(
        &case.response_template,
        &payload,
        config.placeholder_policy,
        "response template",
    )?;

    Ok(RenderedCase {
        payload,
        request,
        expected_response,
    })
}

/// Render every document of a case, including store queries and filters
pub fn preview(case: &TestCase, config: &EngineConfig, values: &dyn ValueSource) -> EngineResult<CasePreview> {
    let payload = Payload::merge(&case.descriptor.template_data.parameters, &values.generate());
    let rendered = render_case(case, payload, config)?;

    let mut store_requests = Vec::with_capacity(case.descriptor.store_verifications.len());
    for group in &case.descriptor.store_verifications {
        let text = match &group.target {
            StoreTarget::Relational { query } => render_with_policy(
                query,
                &rendered.payload,
                config.placeholder_policy,
                &format!("query of '{}'", group.name),
            )?,
            StoreTarget::Document { collection, filter } => {
                let filter = render_value(
                    filter,
                    &rendered.payload,
                    config.placeholder_policy,
                    &format!("filter of '{}'", group.name),
                )?;
                format!("{collection} {filter}")
            }
        };
        store_requests.push((group.name.clone(), text));
    }

    Ok(CasePreview {
        rendered,
        store_requests,
    })
}

pub struct TestCaseDriver<'a, C: ?Sized, R: ?Sized, D: ?Sized> {
    channel: &'a C,
    relational: &'a R,
    documents: &'a D,
    values: Arc<dyn ValueSource>,
    config: EngineConfig,
}

impl<'a, C, R, D> TestCaseDriver<'a, C, R, D>
where
    C: MessageChannel + ?Sized,
    R: RelationalStore + ?Sized,
    D: DocumentStore + ?Sized,
{
    /// Create a driver over borrowed adapters
    pub fn new(channel: &'a C, relational: &'a R, documents: &'a D, config: EngineConfig) -> Self {
        Self {
            channel,
            relational,
            documents,
            values: Arc::new(SystemValueSource::new()),
            config,
        }
    }

    /// Replace the generator of per-run identifiers and timestamps
    pub fn with_value_source(mut self, values: Arc<dyn ValueSource>) -> Self {
        self.values = values;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Static parameters overlaid with freshly generated values
    pub fn build_payload(&self, case: &TestCase) -> Payload {
        Payload::merge(&case.descriptor.template_data.parameters, &self.values.generate())
    }

    /// Run one case to a terminal verdict
    pub async fn run(&self, case: &TestCase) -> CaseOutcome {
        let name = case.name();
        let started = Instant::now();

        logging::log_case_start(
            name,
            &format!(
                "{} -> {}",
                case.descriptor.messaging.input_channel, case.descriptor.messaging.reply.destination
            ),
        );

        let verdict = match self.execute(case).await {
            Ok(()) => Verdict::Pass,
            Err((phase, error)) => Verdict::fail(phase, error.to_string()),
        };

        let elapsed = started.elapsed();
        match &verdict {
            Verdict::Pass => logging::log_case_pass(name, elapsed.as_millis()),
            Verdict::Fail { phase, reason } => logging::log_case_failure(name, phase, reason),
        }

        CaseOutcome {
            name: name.to_string(),
            verdict,
            elapsed,
        }
    }

    async fn execute(&self, case: &TestCase) -> Result<(), (FailurePhase, EngineError)> {
        let name = case.name();
        let descriptor = &case.descriptor;

        let payload = self.build_payload(case);
        case_debug!(name, "Payload built with {} keys", payload.len());

        let rendered = render_case(case, payload, &self.config).map_err(|e| (FailurePhase::Render, e))?;

        let reply_timeout = descriptor.messaging.reply.timeout_or(self.config.reply_timeout());
        logging::log_phase(
            name,
            "exchange",
            &format!("publishing to {}", descriptor.messaging.input_channel),
        );

        let actual = exchange(
            self.channel,
            &descriptor.messaging.input_channel,
            &rendered.request,
            &descriptor.messaging.reply.destination,
            reply_timeout,
        )
        .await
        .map_err(|e| {
            let phase = if e.is_timeout() {
                FailurePhase::ExchangeTimeout
            } else {
                FailurePhase::Exchange
            };
            (phase, e)
        })?;

        let comparison = scrub(
            &actual,
            &rendered.expected_response,
            &self.config.ignore_marker,
            self.config.max_depth,
        )
        .map_err(|e| (FailurePhase::Render, e))?;

        if let Some(mismatch) = comparison.first_mismatch() {
            return Err((
                FailurePhase::ResponseMismatch,
                EngineError::AssertionFailure {
                    path: mismatch.path.clone(),
                    expected: mismatch.expected_text(),
                    actual: mismatch.actual_text(),
                },
            ));
        }
        case_info!(name, "✅ Reply matches expected response");

        let verifier = StoreVerifier::new(self.relational, self.documents, self.config.placeholder_policy);
        for group in &descriptor.store_verifications {
            let timeout = group.timeout_or(self.config.verification_timeout());
            logging::log_phase(
                name,
                "store verification",
                &format!("{} ({}, timeout {:?})", group.name, group.target.kind(), timeout),
            );

            let stats = verifier
                .verify(group, &rendered.payload, timeout, &self.config.poll)
                .await
                .map_err(|e| {
                    let phase = if e.is_timeout() {
                        FailurePhase::StoreVerificationTimeout(group.name.clone())
                    } else if e.is_malformed() {
                        FailurePhase::Render
                    } else {
                        FailurePhase::StoreVerification(group.name.clone())
                    };
                    (phase, e)
                })?;

            case_info!(
                name,
                "✅ Store verification '{}' converged after {} attempt(s)",
                group.name,
                stats.attempts
            );
        }

        Ok(())
    }
}
