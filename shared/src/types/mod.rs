//! Core types used throughout the contract test engine

pub mod descriptor;
pub mod payload;
pub mod values;
pub mod verdict;

pub use descriptor::{
    CaseMetadata, FieldAssertion, Messaging, ReplySpec, StoreKind, StoreTarget, TemplateData,
    TestCaseDescriptor, VerificationGroup,
};
pub use payload::{Payload, string_form};
pub use values::DynamicValues;
pub use verdict::{CaseOutcome, FailurePhase, Verdict};

/// Reply wait applied when a descriptor leaves `messaging.reply.timeout` unset
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 30_000;

/// Convergence wait applied when a verification group leaves `timeout` unset
pub const DEFAULT_VERIFICATION_TIMEOUT_MS: u64 = 10_000;
