//! Shared types for the contract test engine
//!
//! Contains the data model that both the engine and the suite runner speak:
//! test case descriptors, payloads, generated values and case verdicts.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
