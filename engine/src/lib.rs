//! Contract test engine for asynchronous, message-driven transaction flows
//!
//! A test case publishes a rendered request, waits for the correlated reply,
//! compares it against an expected response with `@Ignore@` wildcards, then
//! polls downstream stores until they reflect the transaction. All transports
//! are injected through the traits in [`traits`]; the engine holds no global
//! state and can drive many cases concurrently.

pub mod case;
pub mod config;
pub mod core;
pub mod driver;
pub mod error;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use case::TestCase;
pub use config::{EngineConfig, EngineConfigBuilder, PlaceholderPolicy, PollPolicy};
pub use driver::{CasePreview, RenderedCase, TestCaseDriver, preview, render_case};
pub use error::{EngineError, EngineResult};
pub use traits::{
    CaseSource, DocumentStore, MessageChannel, MockCaseSource, MockDocumentStore, MockMessageChannel,
    MockRelationalStore, MockValueSource, Record, RelationalStore, ValueSource,
};
