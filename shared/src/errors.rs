//! Shared error types for the contract test engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Deserialization failed: {message}")]
    DeserializationError { message: String },

    #[error("Invalid descriptor: {field} {reason}")]
    InvalidDescriptor { field: String, reason: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
