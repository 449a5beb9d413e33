//! Configuration Management
//!
//! Runner configuration and its builder. Engine knobs travel inside
//! [`RunnerConfig::engine`].

pub mod builder;
pub mod runner;

// Re-export main types
pub use builder::RunnerConfigBuilder;
pub use runner::{GATEWAY_URL_ENV, LOG_LEVEL_ENV, RunnerConfig};
