//! Store verification groups
//!
//! One check renders the group's query or filter, runs it on the matching
//! store, and compares the first returned record field by field. An empty or
//! mismatching result means "not yet", never an error; only adapter faults and
//! malformed renders are errors.

use shared::{Payload, StoreTarget, VerificationGroup, string_form};
use std::time::Duration;

use crate::config::{PlaceholderPolicy, PollPolicy};
use crate::core::poller::{PollStats, Probe, poll_until};
use crate::core::template::{render_value, render_with_policy};
use crate::error::EngineResult;
use crate::traits::{DocumentStore, Record, RelationalStore};

pub struct StoreVerifier<'a, R: ?Sized, D: ?Sized> {
    relational: &'a R,
    documents: &'a D,
    policy: PlaceholderPolicy,
}

impl<'a, R, D> StoreVerifier<'a, R, D>
where
    R: RelationalStore + ?Sized,
    D: DocumentStore + ?Sized,
{
    pub fn new(relational: &'a R, documents: &'a D, policy: PlaceholderPolicy) -> Self {
        Self {
            relational,
            documents,
            policy,
        }
    }

    /// Evaluate the group once against its store
    pub async fn check(&self, group: &VerificationGroup, payload: &Payload) -> EngineResult<Probe> {
        let records = match &group.target {
            StoreTarget::Relational { query } => {
                let query = render_with_policy(query, payload, self.policy, &format!("query of '{}'", group.name))?;
                self.relational.query(&query).await?
            }
            StoreTarget::Document { collection, filter } => {
                let filter = render_value(filter, payload, self.policy, &format!("filter of '{}'", group.name))?;
                self.documents.find(collection, &filter).await?
            }
        };

        evaluate(group, &records, payload, self.policy)
    }

    /// Poll the group until it converges or its timeout passes
    pub async fn verify(
        &self,
        group: &VerificationGroup,
        payload: &Payload,
        timeout: Duration,
        poll: &PollPolicy,
    ) -> EngineResult<PollStats> {
        let label = format!("store verification '{}' ({})", group.name, group.target.kind());
        poll_until(&label, timeout, poll, move || self.check(group, payload)).await
    }
}

/// Judge a store result against the group's count and field assertions
pub fn evaluate(
    group: &VerificationGroup,
    records: &[Record],
    payload: &Payload,
    policy: PlaceholderPolicy,
) -> EngineResult<Probe> {
    if let Some(expected) = group.expected_count {
        if records.len() != expected {
            return Ok(Probe::Pending(format!(
                "expected {expected} record(s), found {}",
                records.len()
            )));
        }
    }

    let Some(first) = records.first() else {
        if group.expected_count == Some(0) && group.assertions.is_empty() {
            return Ok(Probe::Converged);
        }
        return Ok(Probe::Pending("no records returned".to_string()));
    };

    for assertion in &group.assertions {
        let expected = render_with_policy(
            &assertion.value,
            payload,
            policy,
            &format!("assertion '{}' of '{}'", assertion.field, group.name),
        )?;

        let actual = match first.get(&assertion.field) {
            Some(value) => string_form(value),
            None => return Ok(Probe::Pending(format!("field '{}' missing", assertion.field))),
        };

        if actual != expected {
            return Ok(Probe::Pending(format!(
                "field '{}': expected '{}', got '{}'",
                assertion.field, expected, actual
            )));
        }
    }

    Ok(Probe::Converged)
}
