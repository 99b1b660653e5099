//! Submission client

use std::fmt;
use std::sync::Arc;

use spyt_core::domain::{JobDescriptor, JobState, SubmissionId};
use spyt_core::dto::transport::{Reply, Request};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result, TransportError};
use crate::http::HttpTransport;
use crate::transport::Transport;

/// Client for the submission service
///
/// Every method issues exactly one request; nothing is cached between calls.
/// Cloning is cheap and clones share the same transport, so one client can
/// serve concurrent status queries for different submissions as long as the
/// transport allows concurrent use.
#[derive(Clone)]
pub struct SubmissionClient {
    transport: Arc<dyn Transport>,
}

impl SubmissionClient {
    /// Create a client owning `transport`
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_transport(Arc::new(transport))
    }

    /// Create a client from a shared transport handle
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a client speaking HTTP to the gateway at `base_url`
    ///
    /// # Example
    /// ```no_run
    /// use spyt_client::SubmissionClient;
    /// use spyt_core::domain::JobDescriptor;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = SubmissionClient::http("http://localhost:6066");
    /// let id = client
    ///     .submit(
    ///         JobDescriptor::builder()
    ///             .app_resource("yt:///home/spark/examples/job.jar")
    ///             .entry_point("tech.ytsaurus.spark.example.SmokeTest")
    ///             .build(),
    ///     )
    ///     .await?;
    /// println!("{}", client.get_status(&id).await?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(base_url))
    }

    /// Submit a job
    ///
    /// The descriptor is validated first; an invalid one fails with
    /// [`ClientError::InvalidDescriptor`] without any request being sent.
    pub async fn submit(&self, descriptor: JobDescriptor) -> Result<SubmissionId> {
        descriptor
            .validate()
            .map_err(ClientError::InvalidDescriptor)?;

        info!(
            "Submitting {} from {}",
            descriptor.entry_point(),
            descriptor.app_resource()
        );

        match self.transport.request(Request::Submit(descriptor)).await? {
            Reply::Submitted(id) => {
                info!("Submission accepted: {}", id);
                Ok(id)
            }
            other => Err(unexpected("submit", &other)),
        }
    }

    /// Get the current state of a submission
    ///
    /// A missing or unrecognised driver state is reported as
    /// [`JobState::Unknown`]; a submission the service does not know fails with
    /// [`ClientError::UnknownSubmission`].
    pub async fn get_status(&self, id: &SubmissionId) -> Result<JobState> {
        match self.transport.request(Request::Status(id.clone())).await? {
            Reply::Status(raw) => {
                let state = raw
                    .as_deref()
                    .map(JobState::from_driver_state)
                    .unwrap_or(JobState::Unknown);
                debug!("Submission {} reported {:?} -> {}", id, raw, state);
                Ok(state)
            }
            Reply::NotFound(_) => Err(ClientError::UnknownSubmission(id.clone())),
            other => Err(unexpected("status", &other)),
        }
    }

    /// Ask the service to kill a submission
    ///
    /// Returns whether the service accepted the request; it usually declines
    /// for submissions that already reached a terminal state.
    pub async fn kill(&self, id: &SubmissionId) -> Result<bool> {
        match self.transport.request(Request::Kill(id.clone())).await? {
            Reply::Killed(accepted) => {
                if accepted {
                    info!("Kill requested for submission {}", id);
                } else {
                    warn!("Service declined to kill submission {}", id);
                }
                Ok(accepted)
            }
            Reply::NotFound(_) => Err(ClientError::UnknownSubmission(id.clone())),
            other => Err(unexpected("kill", &other)),
        }
    }
}

impl fmt::Debug for SubmissionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionClient").finish_non_exhaustive()
    }
}

fn unexpected(operation: &'static str, reply: &Reply) -> ClientError {
    warn!("Unexpected reply to {} request: {:?}", operation, reply);
    TransportError::UnexpectedReply { operation }.into()
}
