//! crates/harness/src/error.rs
//!
//! Error types for driver-facing and host-facing operations.

use thiserror::Error;

use crate::handle::ConnectionId;

/// Result type for driver operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors reported to the test driver.
///
/// Every variant describes an operation that was refused without changing any
/// harness state.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HarnessError {
    /// All connection slots are in use.
    #[error("connection table is full")]
    ConnectionTableFull,
    /// The input queue cannot accept another line.
    #[error("input queue is full")]
    QueueFull,
    /// The connection id is outside the table.
    #[error("connection id {0} is out of range")]
    InvalidConnection(usize),
    /// The connection slot exists but is not active.
    #[error("connection {0} is not active")]
    InactiveConnection(ConnectionId),
    /// The harness was cleaned up and not re-initialized.
    #[error("harness is not initialized")]
    NotInitialized,
    /// A configuration value is outside its allowed range.
    #[error("invalid harness configuration: {0}")]
    InvalidConfig(String),
}

/// Status codes the host server understands from its networking layer.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ErrorCode {
    /// Success.
    #[default]
    None,
    /// A resource quota (listener slots) is exhausted.
    Quota,
    /// The operation is not permitted.
    Perm,
}

impl ErrorCode {
    /// Returns the host's conventional name for the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "E_NONE",
            Self::Quota => "E_QUOTA",
            Self::Perm => "E_PERM",
        }
    }
}

/// Failures returned to the host through the network contract.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum NetworkError {
    /// No listener slot is free.
    #[error("listener table is full")]
    Quota,
    /// The harness never opens outbound connections.
    #[error("operation not permitted by the harness")]
    Permission,
}

impl NetworkError {
    /// Maps the error onto the host's status code.
    #[must_use]
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::Quota => ErrorCode::Quota,
            Self::Permission => ErrorCode::Perm,
        }
    }
}

impl From<NetworkError> for ErrorCode {
    fn from(err: NetworkError) -> Self {
        err.code()
    }
}
