//! In-memory transports for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use spyt_core::domain::SubmissionId;
use spyt_core::dto::transport::{Reply, Request};

use crate::error::TransportError;
use crate::transport::Transport;

type Responder = dyn Fn(usize, &Request) -> Result<Reply, TransportError> + Send + Sync;

/// Transport answering from a closure and recording every request
///
/// The closure receives the zero-based index of the request.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new(
        responder: impl Fn(usize, &Request) -> Result<Reply, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers status requests with `states` in order, repeating the last one
    pub fn with_states(states: &[&str]) -> Self {
        let states: Vec<String> = states.iter().map(|s| s.to_string()).collect();
        Self::new(move |n, _| {
            let state = &states[n.min(states.len() - 1)];
            Ok(Reply::Status(Some(state.clone())))
        })
    }

    /// Fails every request
    pub fn failing() -> Self {
        Self::new(|n, _| Err(TransportError::Other(format!("connection refused ({n})"))))
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, request: Request) -> Result<Reply, TransportError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.responder)(index, &request)
    }
}

/// Minimal submission service: accepts jobs and walks each one through
/// `SUBMITTED → RUNNING → FINISHED`, one step per status request
#[derive(Default)]
pub struct InMemoryService {
    submissions: Mutex<HashMap<SubmissionId, Progress>>,
}

#[derive(Default)]
struct Progress {
    step: usize,
    killed: bool,
}

impl InMemoryService {
    const LIFECYCLE: [&'static str; 3] = ["SUBMITTED", "RUNNING", "FINISHED"];
}

#[async_trait]
impl Transport for InMemoryService {
    async fn request(&self, request: Request) -> Result<Reply, TransportError> {
        let mut submissions = self.submissions.lock().unwrap();
        match request {
            Request::Submit(_) => {
                let id = SubmissionId::new(format!("sub-{}", submissions.len() + 1));
                submissions.insert(id.clone(), Progress::default());
                Ok(Reply::Submitted(id))
            }
            Request::Status(id) => match submissions.get_mut(&id) {
                Some(progress) if progress.killed => Ok(Reply::Status(Some("KILLED".to_string()))),
                Some(progress) => {
                    let state = Self::LIFECYCLE[progress.step.min(Self::LIFECYCLE.len() - 1)];
                    progress.step += 1;
                    Ok(Reply::Status(Some(state.to_string())))
                }
                None => Ok(Reply::NotFound(id)),
            },
            Request::Kill(id) => match submissions.get_mut(&id) {
                Some(progress) => {
                    let finished = progress.step >= Self::LIFECYCLE.len();
                    progress.killed = !finished;
                    Ok(Reply::Killed(!finished))
                }
                None => Ok(Reply::NotFound(id)),
            },
        }
    }
}
