//! SPYT submission client
//!
//! Submits jobs to a remote Spark-over-YT cluster and follows them to a
//! terminal state.
//!
//! The crate is split into:
//! - [`SubmissionClient`]: one request per call (submit, status, kill)
//! - [`StatusPoller`]: repeated status requests with backoff, timeout and cancellation
//! - [`Transport`]: the injected request/reply channel; [`HttpTransport`] speaks
//!   to the REST submission gateway
//!
//! # Example
//!
//! ```no_run
//! use spyt_client::{poll_until_terminal, PollConfig, SubmissionClient};
//! use spyt_core::domain::JobDescriptor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SubmissionClient::http("http://localhost:6066");
//!
//!     let id = client
//!         .submit(
//!             JobDescriptor::builder()
//!                 .app_resource("yt:///home/spark/examples/job.jar")
//!                 .entry_point("tech.ytsaurus.spark.example.SmokeTest")
//!                 .build(),
//!         )
//!         .await?;
//!
//!     let state = poll_until_terminal(&client, &id, PollConfig::default()).await?;
//!     println!("{id} finished as {state} (success: {})", state.is_success());
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod error;
mod client;
mod http;
mod poller;
mod transport;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use cancel::{CancelHandle, CancellationToken};
pub use client::SubmissionClient;
pub use config::PollConfig;
pub use error::{ClientError, Result, TransportError};
pub use http::HttpTransport;
pub use poller::{StatusPoller, poll_until_terminal};
pub use transport::Transport;
