// ABOUTME: SMPP client error types for error handling across all client operations
// ABOUTME: Provides structured error reporting with conversion from I/O and codec errors

use crate::codec::CodecError;
use crate::datatypes::describe_status;
use std::io;
use thiserror::Error;

/// Error type for SMPP client operations
#[derive(Debug, Error)]
pub enum SmppError {
    /// I/O error during network operations (connection, read, write)
    #[error("Connection error: {0}")]
    Connection(#[from] io::Error),

    /// PDU could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// SMPP protocol error indicated by a non-zero command_status
    #[error("Protocol error: {}", describe_status(*.0))]
    Protocol(u32),

    /// Data validation error (invalid message length, malformed addresses, etc.)
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Operation timeout
    #[error("Operation timeout")]
    Timeout,

    /// Unexpected PDU received (wrong response type for request)
    #[error("Unexpected PDU: expected {expected}, got {actual}")]
    UnexpectedPdu { expected: String, actual: String },

    /// Connection closed before the operation completed
    #[error("Connection closed unexpectedly")]
    ConnectionClosed,
}

/// Result type alias for SMPP operations
pub type SmppResult<T> = Result<T, SmppError>;

impl From<Box<dyn std::error::Error + Send + Sync>> for SmppError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match err.downcast::<io::Error>() {
            Ok(io_err) => SmppError::Connection(*io_err),
            Err(err) => match err.downcast::<CodecError>() {
                Ok(codec_err) => SmppError::Codec(*codec_err),
                Err(err) => SmppError::InvalidData(err.to_string()),
            },
        }
    }
}
