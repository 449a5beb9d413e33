//! Contract Test Runner
//!
//! Discovers case descriptors on disk, runs them against one set of gateway
//! adapters and reports a verdict per case.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use runner::*;
//!
//! let config = RunnerConfig::builder()
//!     .case_path("contracts/payments")
//!     .gateway_url("http://localhost:8089")
//!     .fail_fast(true)
//!     .build();
//!
//! let report = SuiteRunner::new(&source, &channel, &relational, &documents, config)
//!     .run()
//!     .await?;
//! assert!(report.is_success());
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod suite;

// Main interfaces - re-exported at crate root for convenience
pub use config::{RunnerConfig, RunnerConfigBuilder};
pub use error::{RunnerError, RunnerResult};
pub use report::SuiteReport;
pub use suite::{SuiteRunner, discover_cases, dry_run};
