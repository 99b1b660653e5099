//! Job lifecycle state

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a submitted job as reported by the service
///
/// `Finished`, `Failed` and `Killed` are terminal and sticky: once the service
/// reports one of them it must keep reporting it. `Unknown` means the service
/// answered but gave no state we can classify; it is not a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Submitted,
    Running,
    Finished,
    Failed,
    Killed,
    Unknown,
}

impl JobState {
    /// Classifies a driver state string returned by the service
    ///
    /// Matching is case-insensitive. `RELAUNCHING` is a running driver being
    /// restarted and `ERROR` is a failure to launch it. Anything else maps to
    /// [`JobState::Unknown`].
    pub fn from_driver_state(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUBMITTED" => JobState::Submitted,
            "RUNNING" | "RELAUNCHING" => JobState::Running,
            "FINISHED" => JobState::Finished,
            "FAILED" | "ERROR" => JobState::Failed,
            "KILLED" => JobState::Killed,
            _ => JobState::Unknown,
        }
    }

    /// No further transition is expected from this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Finished | JobState::Failed | JobState::Killed)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobState::Finished)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobState::Failed | JobState::Killed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Submitted => write!(f, "SUBMITTED"),
            JobState::Running => write!(f, "RUNNING"),
            JobState::Finished => write!(f, "FINISHED"),
            JobState::Failed => write!(f, "FAILED"),
            JobState::Killed => write!(f, "KILLED"),
            JobState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
