//! Submit-and-follow flow
//!
//! Submits the configured job and polls it to a terminal state. When polling
//! is cancelled the submission is killed on a best-effort basis.

use anyhow::{Context, Result};
use spyt_client::{CancellationToken, ClientError, StatusPoller, SubmissionClient};
use spyt_core::domain::{JobState, SubmissionId};
use tracing::{info, warn};

use crate::config::Config;

/// Final result of one launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub submission_id: SubmissionId,
    pub state: JobState,
}

pub struct Launcher {
    config: Config,
    client: SubmissionClient,
}

impl Launcher {
    pub fn new(config: Config, client: SubmissionClient) -> Self {
        Self { config, client }
    }

    /// Submits the job and waits for its terminal state
    pub async fn run(&self, cancel: CancellationToken) -> Result<Outcome> {
        let id = self
            .client
            .submit(self.config.descriptor())
            .await
            .context("Failed to submit job")?;

        info!("Following submission {}", id);

        let poll_config = self.config.poll_config().with_cancellation(cancel);
        let mut poller = StatusPoller::new(&self.client, id.clone(), poll_config);

        match poller.poll_until_terminal().await {
            Ok(state) => Ok(Outcome {
                submission_id: id,
                state,
            }),
            Err(ClientError::PollingCancelled) => {
                self.kill(&id).await;
                Err(ClientError::PollingCancelled)
                    .with_context(|| format!("Stopped following submission {id}"))
            }
            Err(e) => Err(e).with_context(|| format!("Failed to follow submission {id}")),
        }
    }

    async fn kill(&self, id: &SubmissionId) {
        info!("Killing submission {}", id);
        match self.client.kill(id).await {
            Ok(true) => info!("Submission {} killed", id),
            Ok(false) => warn!("Submission {} could not be killed", id),
            Err(e) => warn!("Failed to kill submission {}: {}", id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use spyt_client::{CancelHandle, Transport, TransportError};
    use spyt_core::dto::transport::{Reply, Request};

    /// Replays status replies and records what was asked
    struct FakeGateway {
        states: Vec<&'static str>,
        requests: Mutex<Vec<Request>>,
    }

    impl FakeGateway {
        fn new(states: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                states,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn kills(&self) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| matches!(r, Request::Kill(_)))
                .count()
        }
    }

    #[async_trait]
    impl Transport for FakeGateway {
        async fn request(&self, request: Request) -> Result<Reply, TransportError> {
            let mut requests = self.requests.lock().unwrap();
            let polls = requests
                .iter()
                .filter(|r| matches!(r, Request::Status(_)))
                .count();
            requests.push(request.clone());

            Ok(match request {
                Request::Submit(_) => Reply::Submitted(SubmissionId::new("driver-1")),
                Request::Status(_) => {
                    let state = self.states[polls.min(self.states.len() - 1)];
                    Reply::Status(Some(state.to_string()))
                }
                Request::Kill(_) => Reply::Killed(true),
            })
        }
    }

    fn config() -> Config {
        let vars = [
            ("SPYT_ENDPOINT", "http://localhost:6066"),
            ("SPYT_APP_RESOURCE", "yt:///job.jar"),
            ("SPYT_MAIN_CLASS", "com.example.Main"),
        ];
        Config::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_follows_job_to_completion() {
        let gateway = FakeGateway::new(vec!["SUBMITTED", "RUNNING", "FINISHED"]);
        let launcher = Launcher::new(config(), SubmissionClient::with_transport(gateway.clone()));

        let outcome = launcher.run(CancelHandle::new().token()).await.unwrap();

        assert_eq!(outcome.submission_id.as_str(), "driver-1");
        assert_eq!(outcome.state, JobState::Finished);
        assert_eq!(gateway.kills(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reports_failed_job_as_outcome() {
        let gateway = FakeGateway::new(vec!["RUNNING", "FAILED"]);
        let launcher = Launcher::new(config(), SubmissionClient::with_transport(gateway));

        let outcome = launcher.run(CancelHandle::new().token()).await.unwrap();
        assert!(outcome.state.is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_kills_submission() {
        let gateway = FakeGateway::new(vec!["RUNNING"]);
        let launcher = Launcher::new(config(), SubmissionClient::with_transport(gateway.clone()));
        let handle = CancelHandle::new();
        let token = handle.token();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            handle.cancel();
        });

        let err = launcher.run(token).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::PollingCancelled)
        ));
        assert_eq!(gateway.kills(), 1);
        canceller.await.unwrap();
    }
}
