//! Status poller
//!
//! Repeats status requests for one submission until the service reports a
//! terminal state. Transport failures are retried with exponential backoff,
//! the loop honours an optional wall-clock timeout and a cooperative
//! cancellation token, and both are checked before each request, never while
//! a request is in flight.

use spyt_core::domain::{JobState, SubmissionId};
use tokio::time::{self, Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::client::SubmissionClient;
use crate::config::PollConfig;
use crate::error::{ClientError, Result};

/// Polls one submission
///
/// The poller remembers the terminal state it has seen. Any later poll that
/// reports a different state fails with [`ClientError::InconsistentState`],
/// since terminal states never change on a well-behaved service.
pub struct StatusPoller<'a> {
    client: &'a SubmissionClient,
    id: SubmissionId,
    config: PollConfig,
    last_observed: Option<JobState>,
    terminal: Option<JobState>,
}

impl<'a> StatusPoller<'a> {
    pub fn new(client: &'a SubmissionClient, id: SubmissionId, config: PollConfig) -> Self {
        Self {
            client,
            id,
            config,
            last_observed: None,
            terminal: None,
        }
    }

    pub fn submission_id(&self) -> &SubmissionId {
        &self.id
    }

    /// Most recent state reported by the service
    pub fn last_observed(&self) -> Option<JobState> {
        self.last_observed
    }

    /// Issues a single status request
    pub async fn poll_once(&mut self) -> Result<JobState> {
        let observed = self.client.get_status(&self.id).await?;
        self.observe(observed)
    }

    /// Polls until the submission reaches a terminal state
    ///
    /// Returns as soon as a terminal state is reported, without sleeping.
    /// While the state is not terminal the loop sleeps `interval` between
    /// requests. After the n-th consecutive transport failure it sleeps
    /// `interval * backoff_multiplier^n`, and the failure that reaches
    /// `max_retries` ends polling with [`ClientError::PollingExhausted`].
    /// [`ClientError::UnknownSubmission`] is returned at once.
    pub async fn poll_until_terminal(&mut self) -> Result<JobState> {
        self.config.validate()?;

        let started = Instant::now();
        // a timeout too large to represent means no deadline
        let deadline = self
            .config
            .timeout
            .and_then(|timeout| started.checked_add(timeout));
        let mut failures: u32 = 0;

        loop {
            if self.is_cancelled() {
                info!("Polling of submission {} cancelled", self.id);
                return Err(ClientError::PollingCancelled);
            }

            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    let elapsed = started.elapsed();
                    warn!(
                        "Polling of submission {} timed out after {:?}",
                        self.id, elapsed
                    );
                    return Err(ClientError::PollingTimedOut { elapsed });
                }
            }

            let delay = match self.poll_once().await {
                Ok(state) if state.is_terminal() => return Ok(state),
                Ok(_) => {
                    failures = 0;
                    self.config.interval
                }
                Err(ClientError::Transport(err)) => {
                    failures += 1;
                    if failures >= self.config.max_retries {
                        error!(
                            "Giving up on submission {} after {} failed attempt(s): {}",
                            self.id, failures, err
                        );
                        return Err(ClientError::PollingExhausted {
                            attempts: failures,
                            last: err,
                        });
                    }

                    let delay = self.config.retry_delay(failures);
                    warn!(
                        "Status request for {} failed (attempt {}/{}): {}; retrying in {:?}",
                        self.id, failures, self.config.max_retries, err, delay
                    );
                    delay
                }
                Err(err) => return Err(err),
            };

            self.pause(delay, deadline).await;
        }
    }

    fn observe(&mut self, observed: JobState) -> Result<JobState> {
        if let Some(previous) = self.terminal {
            if previous != observed {
                error!(
                    "Submission {} went from terminal state {} to {}",
                    self.id, previous, observed
                );
                return Err(ClientError::InconsistentState {
                    id: self.id.clone(),
                    previous,
                    observed,
                });
            }
        }

        if self.last_observed != Some(observed) {
            info!("Submission {} is {}", self.id, observed);
        }
        self.last_observed = Some(observed);

        if observed.is_terminal() {
            self.terminal = Some(observed);
        }

        Ok(observed)
    }

    fn is_cancelled(&self) -> bool {
        self.config
            .cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    /// Sleeps for `delay`, cut short by the deadline or by cancellation
    async fn pause(&self, delay: Duration, deadline: Option<Instant>) {
        let wait = match deadline {
            Some(deadline) => delay.min(deadline.saturating_duration_since(Instant::now())),
            None => delay,
        };

        match &self.config.cancellation {
            Some(token) => {
                tokio::select! {
                    _ = time::sleep(wait) => {}
                    _ = token.cancelled() => {
                        debug!("Backoff for submission {} interrupted by cancellation", self.id);
                    }
                }
            }
            None => time::sleep(wait).await,
        }
    }
}

/// Polls `id` with a fresh [`StatusPoller`] until it reaches a terminal state
pub async fn poll_until_terminal(
    client: &SubmissionClient,
    id: &SubmissionId,
    config: PollConfig,
) -> Result<JobState> {
    StatusPoller::new(client, id.clone(), config)
        .poll_until_terminal()
        .await
}
