//! Core engine logic
//!
//! Rendering, value generation and scrubbing are pure and deterministic given
//! their inputs. Polling, exchange and store verification only touch the
//! outside world through the adapter traits they are handed.

pub mod differ;
pub mod exchange;
pub mod generator;
pub mod poller;
pub mod template;
pub mod verifier;

pub use differ::{Comparison, IGNORE_SENTINEL, Mismatch, scrub};
pub use exchange::exchange;
pub use generator::SystemValueSource;
pub use poller::{PollStats, Probe, poll_until};
pub use template::{render, render_document, render_value, render_with_policy, unresolved_keys};
pub use verifier::StoreVerifier;
