//! Runner Configuration
//!
//! What to run, where the gateway lives and how the suite reacts to failures

use engine::EngineConfig;
use std::path::PathBuf;

use crate::error::{RunnerError, RunnerResult};

/// Environment variable holding the gateway base URL
pub const GATEWAY_URL_ENV: &str = "CONTRACT_GATEWAY_URL";

/// Environment variable holding the default log level
pub const LOG_LEVEL_ENV: &str = "CONTRACT_LOG_LEVEL";

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Descriptor files or directories holding descriptors
    pub case_paths: Vec<PathBuf>,
    pub gateway_url: Option<String>,
    pub log_level: String,
    /// Stop at the first failing case
    pub fail_fast: bool,
    /// Render every case without touching any adapter
    pub dry_run: bool,
    pub engine: EngineConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            case_paths: Vec::new(),
            gateway_url: None,
            log_level: "info".to_string(),
            fail_fast: false,
            dry_run: false,
            engine: EngineConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Create a new builder
    pub fn builder() -> crate::config::builder::RunnerConfigBuilder {
        crate::config::builder::RunnerConfigBuilder::new()
    }

    /// Gateway URL, required for anything but a dry run
    pub fn require_gateway_url(&self) -> RunnerResult<&str> {
        self.gateway_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                RunnerError::Config(format!(
                    "a gateway URL is required; pass --gateway-url or set {GATEWAY_URL_ENV}"
                ))
            })
    }

    /// Check that the configuration can run a suite
    pub fn validate(&self) -> RunnerResult<()> {
        if self.case_paths.is_empty() {
            return Err(RunnerError::Config("at least one case path is required".to_string()));
        }
        if self.engine.ignore_marker.is_empty() {
            return Err(RunnerError::Config("the ignore marker cannot be empty".to_string()));
        }
        if !self.dry_run {
            self.require_gateway_url()?;
        }
        Ok(())
    }
}
