//! Test case verdicts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Phase of a test case execution that produced a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "group", rename_all = "kebab-case")]
pub enum FailurePhase {
    /// Descriptor, template or filter could not be rendered or parsed
    Render,
    /// Publishing the request or receiving the reply failed at the transport
    Exchange,
    /// No reply arrived within the reply timeout
    ExchangeTimeout,
    /// The reply did not match the expected response
    ResponseMismatch,
    /// A store adapter failed while verifying the named group
    StoreVerification(String),
    /// The named group never converged within its timeout
    StoreVerificationTimeout(String),
}

impl fmt::Display for FailurePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePhase::Render => write!(f, "render"),
            FailurePhase::Exchange => write!(f, "exchange"),
            FailurePhase::ExchangeTimeout => write!(f, "exchange-timeout"),
            FailurePhase::ResponseMismatch => write!(f, "response-mismatch"),
            FailurePhase::StoreVerification(group) => write!(f, "store-verification({group})"),
            FailurePhase::StoreVerificationTimeout(group) => {
                write!(f, "store-verification-timeout({group})")
            }
        }
    }
}

/// Terminal state of one test case; there is no partial pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail { phase: FailurePhase, reason: String },
}

impl Verdict {
    pub fn fail(phase: FailurePhase, reason: impl Into<String>) -> Self {
        Verdict::Fail {
            phase,
            reason: reason.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn phase(&self) -> Option<&FailurePhase> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail { phase, .. } => Some(phase),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail { phase, reason } => write!(f, "FAIL [{phase}] {reason}"),
        }
    }
}

/// Outcome of one test case execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub name: String,
    pub verdict: Verdict,
    pub elapsed: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(FailurePhase::ExchangeTimeout.to_string(), "exchange-timeout");
        assert_eq!(FailurePhase::ResponseMismatch.to_string(), "response-mismatch");
        assert_eq!(
            FailurePhase::StoreVerificationTimeout("ledger".to_string()).to_string(),
            "store-verification-timeout(ledger)"
        );
    }

    #[test]
    fn test_verdict_display() {
        let verdict = Verdict::fail(FailurePhase::ResponseMismatch, "$.status: expected \"OK\", got \"KO\"");
        assert!(!verdict.is_pass());
        assert_eq!(
            verdict.to_string(),
            "FAIL [response-mismatch] $.status: expected \"OK\", got \"KO\""
        );
        assert_eq!(Verdict::Pass.to_string(), "PASS");
    }
}
