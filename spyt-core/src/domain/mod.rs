//! Core domain types
//!
//! These types describe what gets submitted and what the service reports back.
//! They are plain immutable values; nothing here performs I/O.

pub mod descriptor;
pub mod state;
pub mod submission;

pub use descriptor::{CredentialRef, JobDescriptor, JobDescriptorBuilder};
pub use state::JobState;
pub use submission::SubmissionId;
