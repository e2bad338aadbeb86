use thiserror::Error;

/// Why a single dispatch attempt failed.
///
/// Carried inside an outcome and reported to the metrics sink; it never
/// leaves the virtual-user loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Request timed out.")]
    Timeout,
    #[error("Connection failed: {message}")]
    Connect { message: String },
    #[error("Transport error: {message}")]
    Transport { message: String },
    #[error("Unexpected status {status} (expected {expected}).")]
    UnexpectedStatus { status: u16, expected: u16 },
    #[error("Failed to build request: {message}")]
    BuildRequest { message: String },
}

impl DispatchError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            DispatchError::Timeout => "timeout",
            DispatchError::Connect { .. } => "connect",
            DispatchError::Transport { .. } => "transport",
            DispatchError::UnexpectedStatus { .. } => "unexpected_status",
            DispatchError::BuildRequest { .. } => "build_request",
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            DispatchError::UnexpectedStatus { status, .. } => Some(*status),
            DispatchError::Timeout
            | DispatchError::Connect { .. }
            | DispatchError::Transport { .. }
            | DispatchError::BuildRequest { .. } => None,
        }
    }
}
