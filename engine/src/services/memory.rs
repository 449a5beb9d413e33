//! In-memory loopback channel
//!
//! Each destination is a broadcast topic. A message reaches every subscriber
//! registered at publish time; with no subscriber it is dropped, as on a
//! non-durable topic.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::{EngineError, EngineResult};
use crate::traits::MessageChannel;

const ADAPTER: &str = "in-memory channel";

#[derive(Debug)]
pub struct InMemoryChannel {
    topics: Mutex<HashMap<String, broadcast::Sender<Value>>>,
    capacity: usize,
    closed: AtomicBool,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of subscriptions currently waiting on `destination`
    pub fn subscriber_count(&self, destination: &str) -> usize {
        let topics = self.topics.lock().unwrap_or_else(|p| p.into_inner());
        topics.get(destination).map(|tx| tx.receiver_count()).unwrap_or(0)
    }

    fn sender(&self, destination: &str) -> EngineResult<broadcast::Sender<Value>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(EngineError::transport(ADAPTER, "channel is closed"));
        }

        let mut topics = self.topics.lock().unwrap_or_else(|p| p.into_inner());
        let sender = topics
            .entry(destination.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        Ok(sender.clone())
    }
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageChannel for InMemoryChannel {
    async fn publish(&self, destination: &str, body: &Value) -> EngineResult<()> {
        let sender = self.sender(destination)?;
        let delivered = sender.send(body.clone()).unwrap_or(0);
        tracing::debug!("📤 Published to {} ({} subscriber(s))", destination, delivered);
        Ok(())
    }

    async fn subscribe(&self, destination: &str, timeout: Duration) -> EngineResult<Value> {
        let mut receiver = self.sender(destination)?.subscribe();

        let received = tokio::time::timeout(timeout, async {
            loop {
                match receiver.recv().await {
                    Ok(message) => return Ok(message),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("⚠️ Subscriber on {} skipped {} message(s)", destination, skipped);
                    }
                    Err(RecvError::Closed) => {
                        return Err(EngineError::transport(ADAPTER, format!("{destination} closed")));
                    }
                }
            }
        })
        .await;

        match received {
            Ok(result) => result,
            Err(_) => Err(EngineError::timeout(format!("message on '{destination}'"), timeout)),
        }
    }

    async fn close(&self) -> EngineResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.topics.lock().unwrap_or_else(|p| p.into_inner()).clear();
        Ok(())
    }
}
