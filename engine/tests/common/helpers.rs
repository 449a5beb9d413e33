//! Test helpers and builder patterns for engine tests
//!
//! This module provides builders for in-code test cases, a responder channel
//! double and shortcuts for common mock setups.

use async_trait::async_trait;
use engine::services::InMemoryChannel;
use engine::{
    EngineConfig, EngineResult, MessageChannel, MockDocumentStore, MockRelationalStore, MockValueSource, PollPolicy,
    Record, RelationalStore, TestCase,
};
use serde_json::{Value, json};
use shared::{
    CaseMetadata, FieldAssertion, Messaging, ReplySpec, StoreTarget, TemplateData, TestCaseDescriptor,
    VerificationGroup,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::fixtures::TestFixtures;

/// Channel double that answers every publish on `input` from inside `publish`
///
/// The reply is pushed onto `reply_destination` before `publish` returns, so
/// only a subscription that is already in flight can observe it.
pub struct EchoChannel {
    inner: InMemoryChannel,
    input: String,
    reply_destination: String,
    responder: Box<dyn Fn(&Value) -> Value + Send + Sync>,
    published: AtomicUsize,
}

impl EchoChannel {
    pub fn new<F>(input: &str, reply_destination: &str, responder: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            inner: InMemoryChannel::new(),
            input: input.to_string(),
            reply_destination: reply_destination.to_string(),
            responder: Box::new(responder),
            published: AtomicUsize::new(0),
        }
    }

    /// Replies with a fixed body
    pub fn constant(input: &str, reply_destination: &str, reply: Value) -> Self {
        Self::new(input, reply_destination, move |_| reply.clone())
    }

    pub fn published(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageChannel for EchoChannel {
    async fn publish(&self, destination: &str, body: &Value) -> EngineResult<()> {
        self.published.fetch_add(1, Ordering::SeqCst);
        self.inner.publish(destination, body).await?;

        if destination == self.input {
            let reply = (self.responder)(body);
            self.inner.publish(&self.reply_destination, &reply).await?;
        }
        Ok(())
    }

    async fn subscribe(&self, destination: &str, timeout: Duration) -> EngineResult<Value> {
        self.inner.subscribe(destination, timeout).await
    }

    async fn close(&self) -> EngineResult<()> {
        self.inner.close().await
    }
}

/// Relational store whose queries never complete, like a stalled gateway
pub struct StalledRelationalStore;

#[async_trait]
impl RelationalStore for StalledRelationalStore {
    async fn query(&self, _query: &str) -> EngineResult<Vec<Record>> {
        std::future::pending().await
    }

    async fn close(&self) -> EngineResult<()> {
        Ok(())
    }
}

/// Builder for in-code test cases with sensible defaults
pub struct TestCaseBuilder {
    name: String,
    request_template: String,
    response_template: String,
    parameters: BTreeMap<String, Value>,
    reply_timeout_ms: Option<u64>,
    groups: Vec<VerificationGroup>,
}

impl TestCaseBuilder {
    pub fn new(name: &str) -> Self {
        let mut parameters = BTreeMap::new();
        parameters.insert("status".to_string(), json!("OK"));
        parameters.insert("amount".to_string(), json!(TestFixtures::AMOUNT));

        Self {
            name: name.to_string(),
            request_template: TestFixtures::REQUEST_TEMPLATE.to_string(),
            response_template: TestFixtures::RESPONSE_TEMPLATE.to_string(),
            parameters,
            reply_timeout_ms: Some(1_000),
            groups: Vec::new(),
        }
    }

    pub fn request(mut self, template: &str) -> Self {
        self.request_template = template.to_string();
        self
    }

    pub fn response(mut self, template: &str) -> Self {
        self.response_template = template.to_string();
        self
    }

    pub fn param(mut self, key: &str, value: Value) -> Self {
        self.parameters.insert(key.to_string(), value);
        self
    }

    pub fn reply_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.reply_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn relational_group(mut self, name: &str, query: &str, assertions: &[(&str, &str)], timeout_ms: u64) -> Self {
        self.groups.push(VerificationGroup {
            name: name.to_string(),
            target: StoreTarget::Relational {
                query: query.to_string(),
            },
            expected_count: None,
            timeout_ms: Some(timeout_ms),
            assertions: to_assertions(assertions),
        });
        self
    }

    pub fn document_group(
        mut self,
        name: &str,
        collection: &str,
        filter: Value,
        expected_count: Option<usize>,
        assertions: &[(&str, &str)],
        timeout_ms: u64,
    ) -> Self {
        self.groups.push(VerificationGroup {
            name: name.to_string(),
            target: StoreTarget::Document {
                collection: collection.to_string(),
                filter,
            },
            expected_count,
            timeout_ms: Some(timeout_ms),
            assertions: to_assertions(assertions),
        });
        self
    }

    pub fn build(self) -> TestCase {
        let descriptor = TestCaseDescriptor {
            metadata: CaseMetadata {
                name: self.name,
                description: None,
                tags: Vec::new(),
            },
            template_data: TemplateData {
                template_path: "request.json".to_string(),
                parameters: self.parameters,
            },
            messaging: Messaging {
                input_channel: TestFixtures::INPUT.to_string(),
                reply: ReplySpec {
                    destination: TestFixtures::OUTPUT.to_string(),
                    timeout_ms: self.reply_timeout_ms,
                    response_template_path: "response.json".to_string(),
                },
            },
            store_verifications: self.groups,
        };
        descriptor.validate().unwrap();

        TestCase::new(descriptor, self.request_template, self.response_template)
    }
}

fn to_assertions(assertions: &[(&str, &str)]) -> Vec<FieldAssertion> {
    assertions
        .iter()
        .map(|(field, value)| FieldAssertion {
            field: field.to_string(),
            value: value.to_string(),
        })
        .collect()
}

/// Common helper functions for engine tests
pub struct TestHelpers;

impl TestHelpers {
    /// Value source that always yields the fixture values
    pub fn fixed_values() -> Arc<MockValueSource> {
        let mut values = MockValueSource::new();
        values.expect_generate().returning(TestFixtures::dynamic_values);
        Arc::new(values)
    }

    /// Engine config with fast polling for tests
    pub fn fast_config() -> EngineConfig {
        EngineConfig::builder()
            .poll_policy(PollPolicy::fixed(Duration::from_millis(20)))
            .build()
    }

    /// Relational store that must never be queried
    pub fn untouched_relational() -> MockRelationalStore {
        let mut store = MockRelationalStore::new();
        store.expect_query().times(0);
        store
    }

    /// Document store that must never be queried
    pub fn untouched_documents() -> MockDocumentStore {
        let mut store = MockDocumentStore::new();
        store.expect_find().times(0);
        store
    }

    /// Relational store returning nothing for `empty_polls` calls, then `row`
    pub fn converging_relational(empty_polls: usize, row: Record) -> (MockRelationalStore, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut store = MockRelationalStore::new();
        store.expect_query().returning(move |_: &str| {
            if counter.fetch_add(1, Ordering::SeqCst) < empty_polls {
                Ok(vec![])
            } else {
                Ok(vec![row.clone()])
            }
        });

        (store, calls)
    }

    /// Channel that replies with `reply` to every request on the fixture input
    pub fn replying_channel(reply: Value) -> EchoChannel {
        EchoChannel::constant(TestFixtures::INPUT, TestFixtures::OUTPUT, reply)
    }
}
