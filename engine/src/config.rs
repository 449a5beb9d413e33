//! Engine configuration
//!
//! Every knob has a default matching the behavior test authors expect from a
//! bare descriptor: `@Ignore@` wildcards, lenient placeholders, 30s reply wait,
//! 10s store convergence wait and a 100ms → 1s back-off.

use serde::{Deserialize, Serialize};
use shared::{DEFAULT_REPLY_TIMEOUT_MS, DEFAULT_VERIFICATION_TIMEOUT_MS};
use std::time::Duration;

use crate::core::differ::IGNORE_SENTINEL;

/// How the renderer treats `${key}` placeholders with no payload entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderPolicy {
    /// Leave the placeholder text in place
    #[default]
    Lenient,
    /// Fail rendering and list the unresolved keys
    Strict,
}

/// Back-off between store polls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollPolicy {
    pub initial_interval_ms: u64,
    /// Growth factor applied after every unsuccessful poll; 1 keeps the interval fixed
    pub multiplier: u32,
    pub max_interval_ms: u64,
}

impl PollPolicy {
    pub fn fixed(interval: Duration) -> Self {
        let ms = interval.as_millis() as u64;
        Self {
            initial_interval_ms: ms,
            multiplier: 1,
            max_interval_ms: ms,
        }
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms.max(1))
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms.max(self.initial_interval_ms).max(1))
    }

    pub fn next_interval(&self, current: Duration) -> Duration {
        current
            .saturating_mul(self.multiplier.max(1))
            .min(self.max_interval())
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval_ms: 100,
            multiplier: 2,
            max_interval_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Expected-response value meaning "do not compare this field"
    pub ignore_marker: String,
    pub placeholder_policy: PlaceholderPolicy,
    pub reply_timeout_ms: u64,
    pub verification_timeout_ms: u64,
    pub poll: PollPolicy,
    /// Nesting limit for expected-response trees
    pub max_depth: usize,
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }

    pub fn verification_timeout(&self) -> Duration {
        Duration::from_millis(self.verification_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ignore_marker: IGNORE_SENTINEL.to_string(),
            placeholder_policy: PlaceholderPolicy::Lenient,
            reply_timeout_ms: DEFAULT_REPLY_TIMEOUT_MS,
            verification_timeout_ms: DEFAULT_VERIFICATION_TIMEOUT_MS,
            poll: PollPolicy::default(),
            max_depth: 64,
        }
    }
}

pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Set the ignore marker used in expected responses
    pub fn ignore_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.config.ignore_marker = marker.into();
        self
    }

    /// Fail rendering on unresolved placeholders
    pub fn strict_placeholders(mut self) -> Self {
        self.config.placeholder_policy = PlaceholderPolicy::Strict;
        self
    }

    pub fn placeholder_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.config.placeholder_policy = policy;
        self
    }

    /// Reply wait for descriptors without `messaging.reply.timeout`
    pub fn reply_timeout(mut self, timeout: Duration) -> Self {
        self.config.reply_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Convergence wait for groups without `timeout`
    pub fn verification_timeout(mut self, timeout: Duration) -> Self {
        self.config.verification_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn poll_policy(mut self, policy: PollPolicy) -> Self {
        self.config.poll = policy;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
