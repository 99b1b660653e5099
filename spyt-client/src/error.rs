//! Error types for the submission client

use std::time::Duration;

use spyt_core::domain::{JobState, SubmissionId};
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures of the transport layer
///
/// Every variant is treated as transient by the status poller.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Gateway answered with a non-success status code
    #[error("gateway error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error body returned by the gateway
        message: String,
    },

    /// Gateway refused the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Failed to parse response
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// Reply did not match the request that was sent
    #[error("unexpected reply to {operation} request")]
    UnexpectedReply {
        /// Operation name of the request
        operation: &'static str,
    },

    /// Any other transport failure
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create a status error from status code and message
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

/// Errors returned by [`SubmissionClient`](crate::SubmissionClient) and
/// [`StatusPoller`](crate::StatusPoller)
#[derive(Debug, Error)]
pub enum ClientError {
    /// Descriptor failed local validation; nothing was sent
    #[error("invalid job descriptor: {0}")]
    InvalidDescriptor(String),

    /// Poll configuration is unusable; nothing was sent
    #[error("invalid poll configuration: {0}")]
    InvalidConfig(String),

    /// A single request failed in the transport
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service does not know this submission
    #[error("unknown submission: {0}")]
    UnknownSubmission(SubmissionId),

    /// Too many consecutive transport failures while polling
    #[error("polling gave up after {attempts} failed attempt(s): {last}")]
    PollingExhausted {
        /// Consecutive failed requests
        attempts: u32,
        /// Error of the final attempt
        #[source]
        last: TransportError,
    },

    /// The polling deadline passed before a terminal state was seen
    #[error("polling timed out after {elapsed:?}")]
    PollingTimedOut {
        /// Time spent since the first request
        elapsed: Duration,
    },

    /// Polling was cancelled by the caller
    #[error("polling cancelled")]
    PollingCancelled,

    /// The service reported a change away from a terminal state
    #[error("submission {id} left terminal state {previous} (now {observed})")]
    InconsistentState {
        id: SubmissionId,
        previous: JobState,
        observed: JobState,
    },
}

impl ClientError {
    /// Check if this error may go away on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this error is an "unknown submission" error
    pub fn is_unknown_submission(&self) -> bool {
        matches!(self, Self::UnknownSubmission(_))
    }

    /// Check if this error ended a polling loop
    pub fn is_polling_failure(&self) -> bool {
        matches!(
            self,
            Self::PollingExhausted { .. }
                | Self::PollingTimedOut { .. }
                | Self::PollingCancelled
                | Self::InconsistentState { .. }
        )
    }
}
