//! Request/reply pair exchanged with a transport
//!
//! The client never looks past these enums: how a request is encoded and sent
//! is up to the `Transport` implementation.

use crate::domain::{JobDescriptor, SubmissionId};

/// A single request to the submission service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Submit a new job
    Submit(JobDescriptor),
    /// Ask for the current driver state of a submission
    Status(SubmissionId),
    /// Ask the service to kill a submission
    Kill(SubmissionId),
}

impl Request {
    /// Short operation name, used in logs and error messages
    pub fn operation(&self) -> &'static str {
        match self {
            Request::Submit(_) => "submit",
            Request::Status(_) => "status",
            Request::Kill(_) => "kill",
        }
    }
}

/// Reply from the submission service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The job was accepted under this id
    Submitted(SubmissionId),
    /// Raw driver state, `None` when the service reported none
    Status(Option<String>),
    /// Whether the service accepted the kill request
    Killed(bool),
    /// The service does not know this submission
    NotFound(SubmissionId),
}
