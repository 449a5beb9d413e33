//! Service implementations
//!
//! Concrete adapters for the engine's collaborator traits. The gateway
//! adapters talk to a broker/store bridge over HTTP; the in-memory channel is
//! a loopback broker for local runs and tests.

pub mod file_source;
pub mod gateway;
pub mod memory;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use file_source::FsCaseSource;
pub use gateway::{GatewayClient, HttpChannel, HttpDocumentStore, HttpRelationalStore};
pub use memory::InMemoryChannel;
