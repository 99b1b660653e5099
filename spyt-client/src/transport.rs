//! Transport boundary
//!
//! The client talks to the submission service only through [`Transport`].
//! Implementations decide how a [`Request`] is encoded and delivered.

use async_trait::async_trait;
use spyt_core::dto::transport::{Reply, Request};

use crate::error::TransportError;

/// Request/response channel to the submission service
///
/// One client shares its transport across every concurrent caller, so
/// implementations must be safe to call concurrently. The client does not
/// check this.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and waits for its reply
    async fn request(&self, request: Request) -> Result<Reply, TransportError>;
}
