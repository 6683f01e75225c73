//! Error types for swipe navigation

use thiserror::Error;

/// Result type alias for swipe navigation operations
pub type Result<T> = std::result::Result<T, SwipeError>;

/// Swipe navigation error types
///
/// The recognizer itself never fails; these surface from the relay,
/// navigation executors, configuration and the CLI.
#[derive(Debug, Error)]
pub enum SwipeError {
    /// Relay context is not listening
    #[error("relay unavailable: {0}")]
    RelayUnavailable(String),

    /// Connection to relay failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Relay did not answer within the command timeout
    #[error("relay timed out")]
    ConnectionTimeout,

    /// Protocol error (malformed message)
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// History navigation could not be performed
    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    /// Invalid command arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Malformed touch trace
    #[error("invalid trace at line {line}: {message}")]
    InvalidTrace { line: usize, message: String },

    /// IO error
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SwipeError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SwipeError::RelayUnavailable(_) => 2,
            SwipeError::ConnectionFailed(_) | SwipeError::ConnectionTimeout => 3,
            SwipeError::NavigationFailed(_) => 1,
            SwipeError::InvalidArguments(_) => 64,   // EX_USAGE
            SwipeError::InvalidTrace { .. } => 65,   // EX_DATAERR
            SwipeError::ProtocolError(_) => 76,      // EX_PROTOCOL
            SwipeError::IoError(_) => 74,            // EX_IOERR
            SwipeError::SerializationError(_) => 65, // EX_DATAERR
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
