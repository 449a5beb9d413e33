//! Bounded polling until a predicate converges
//!
//! The predicate runs immediately, then again after each back-off interval.
//! Every evaluation races the deadline: a check still in flight when the
//! timeout passes is dropped and not waited on further.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::PollPolicy;
use crate::error::{EngineError, EngineResult};

/// Result of one predicate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Converged,
    /// Not yet; the reason is reported if the deadline passes
    Pending(String),
}

impl From<bool> for Probe {
    fn from(converged: bool) -> Self {
        if converged {
            Probe::Converged
        } else {
            Probe::Pending("predicate returned false".to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Re-evaluate `predicate` until it converges or `timeout` elapses
///
/// Errors returned by the predicate abort polling immediately; only
/// [`Probe::Pending`] (or `false`) is retried. On timeout the error names
/// `label` and carries the last pending reason.
pub async fn poll_until<F, Fut, T>(
    label: &str,
    timeout: Duration,
    policy: &PollPolicy,
    mut predicate: F,
) -> EngineResult<PollStats>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = EngineResult<T>>,
    T: Into<Probe>,
{
    let started = Instant::now();
    let mut interval = policy.initial_interval();
    let mut attempts = 0u32;
    let mut last_reason: Option<String> = None;

    loop {
        attempts += 1;
        let remaining = timeout.saturating_sub(started.elapsed());

        // The inner future is polled once before the deadline is checked
        let probe = match tokio::time::timeout(remaining, predicate()).await {
            Ok(result) => result?.into(),
            Err(_) => {
                let reason = last_reason.unwrap_or_else(|| IN_FLIGHT.to_string());
                tracing::warn!("⏰ {} did not converge within {:?}: {}", label, timeout, reason);
                return Err(timed_out(label, timeout, reason));
            }
        };

        match probe {
            Probe::Converged => {
                let elapsed = started.elapsed();
                tracing::debug!("✅ {} converged after {} attempt(s) in {:?}", label, attempts, elapsed);
                return Ok(PollStats { attempts, elapsed });
            }
            Probe::Pending(reason) => {
                let elapsed = started.elapsed();
                if elapsed >= timeout {
                    tracing::warn!("⏰ {} did not converge within {:?}: {}", label, timeout, reason);
                    return Err(timed_out(label, timeout, reason));
                }

                tracing::debug!("🔄 {} not yet converged (attempt {}): {}", label, attempts, reason);
                last_reason = Some(reason);
                tokio::time::sleep(interval.min(timeout - elapsed)).await;
                interval = policy.next_interval(interval);
            }
        }
    }
}

/// Reported when the deadline passes before any check finished
const IN_FLIGHT: &str = "check still in flight";

fn timed_out(label: &str, timeout: Duration, reason: String) -> EngineError {
    EngineError::Timeout {
        what: label.to_string(),
        after: timeout,
        last_observation: Some(reason),
    }
}
