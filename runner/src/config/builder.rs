//! Runner Configuration Builder
//!
//! Provides a flexible builder pattern for constructing runner configurations

use engine::{EngineConfig, PlaceholderPolicy, PollPolicy};
use std::path::PathBuf;
use std::time::Duration;

use super::RunnerConfig;

pub struct RunnerConfigBuilder {
    config: RunnerConfig,
}

impl RunnerConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RunnerConfig::default(),
        }
    }

    /// Add a descriptor file or a directory of descriptors
    pub fn case_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.case_paths.push(path.into());
        self
    }

    /// Add several descriptor paths at once
    pub fn case_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config.case_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Set the gateway base URL
    pub fn gateway_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.gateway_url = Some(url.into());
        self
    }

    /// Set log level (trace, debug, info, warn, error)
    pub fn log_level<S: Into<String>>(mut self, level: S) -> Self {
        self.config.log_level = level.into();
        self
    }

    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.config.fail_fast = enabled;
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.config.dry_run = enabled;
        self
    }

    /// Replace the whole engine configuration
    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn ignore_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.config.engine.ignore_marker = marker.into();
        self
    }

    pub fn strict_placeholders(mut self, enabled: bool) -> Self {
        self.config.engine.placeholder_policy = if enabled {
            PlaceholderPolicy::Strict
        } else {
            PlaceholderPolicy::Lenient
        };
        self
    }

    /// Fixed interval between store polls
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.engine.poll = PollPolicy::fixed(interval);
        self
    }

    /// Reply wait for cases without `messaging.reply.timeout`
    pub fn reply_timeout(mut self, timeout: Duration) -> Self {
        self.config.engine.reply_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Convergence wait for groups without `timeout`
    pub fn verification_timeout(mut self, timeout: Duration) -> Self {
        self.config.engine.verification_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Build the configuration
    pub fn build(self) -> RunnerConfig {
        self.config
    }
}

impl Default for RunnerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
