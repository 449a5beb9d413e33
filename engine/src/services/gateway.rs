//! HTTP gateway adapters
//!
//! Talks to a bridge service that fronts the broker and the stores:
//!
//! | operation | request                                          | success        |
//! |-----------|--------------------------------------------------|----------------|
//! | publish   | `POST {base}/publish/{destination}` JSON body    | any 2xx        |
//! | subscribe | `GET {base}/subscribe/{destination}?timeoutMs=N` | 200 + JSON     |
//! | query     | `POST {base}/query` `{"sql": "..."}`             | 200 + rows     |
//! | find      | `POST {base}/find` `{"collection", "filter"}`    | 200 + docs     |
//!
//! A subscribe answered with 204 or 408 means nothing arrived in time.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;

use crate::error::{EngineError, EngineResult};
use crate::traits::{DocumentStore, MessageChannel, Record, RelationalStore};

/// Extra time granted to the HTTP request beyond the subscribe timeout
const SUBSCRIBE_GRACE: Duration = Duration::from_secs(5);

/// Shared HTTP client bound to a gateway base URL
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn destination_url(&self, operation: &str, destination: &str) -> String {
        self.url(&format!("{operation}/{}", destination.trim_start_matches('/')))
    }

    async fn post_for_records(&self, adapter: &str, path: &str, body: &Value) -> EngineResult<Vec<Record>> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::transport(adapter, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EngineError::transport(adapter, format!("HTTP {status}: {detail}")));
        }

        response
            .json::<Vec<Record>>()
            .await
            .map_err(|e| EngineError::transport(adapter, format!("invalid response body: {e}")))
    }
}

/// Message channel over the gateway
#[derive(Debug, Clone)]
pub struct HttpChannel {
    gateway: GatewayClient,
}

impl HttpChannel {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl MessageChannel for HttpChannel {
    async fn publish(&self, destination: &str, body: &Value) -> EngineResult<()> {
        let response = self
            .gateway
            .client
            .post(self.gateway.destination_url("publish", destination))
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::transport("gateway channel", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::transport(
                "gateway channel",
                format!("publish to {destination} returned HTTP {status}"),
            ));
        }
        Ok(())
    }

    async fn subscribe(&self, destination: &str, timeout: Duration) -> EngineResult<Value> {
        let response = self
            .gateway
            .client
            .get(self.gateway.destination_url("subscribe", destination))
            .query(&[("timeoutMs", timeout.as_millis().to_string())])
            .timeout(timeout + SUBSCRIBE_GRACE)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::timeout(format!("reply on '{destination}'"), timeout)
                } else {
                    EngineError::transport("gateway channel", e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::OK => response
                .json::<Value>()
                .await
                .map_err(|e| EngineError::transport("gateway channel", format!("invalid reply body: {e}"))),
            StatusCode::NO_CONTENT | StatusCode::REQUEST_TIMEOUT => {
                Err(EngineError::timeout(format!("reply on '{destination}'"), timeout))
            }
            status => Err(EngineError::transport(
                "gateway channel",
                format!("subscribe to {destination} returned HTTP {status}"),
            )),
        }
    }

    async fn close(&self) -> EngineResult<()> {
        Ok(())
    }
}

/// Relational store over the gateway
#[derive(Debug, Clone)]
pub struct HttpRelationalStore {
    gateway: GatewayClient,
}

impl HttpRelationalStore {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl RelationalStore for HttpRelationalStore {
    async fn query(&self, query: &str) -> EngineResult<Vec<Record>> {
        self.gateway
            .post_for_records("gateway relational store", "query", &json!({ "sql": query }))
            .await
    }

    async fn close(&self) -> EngineResult<()> {
        Ok(())
    }
}

/// Document store over the gateway
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    gateway: GatewayClient,
}

impl HttpDocumentStore {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn find(&self, collection: &str, filter: &Value) -> EngineResult<Vec<Record>> {
        self.gateway
            .post_for_records(
                "gateway document store",
                "find",
                &json!({ "collection": collection, "filter": filter }),
            )
            .await
    }

    async fn close(&self) -> EngineResult<()> {
        Ok(())
    }
}
