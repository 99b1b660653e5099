//! HTTP transport for the REST submission gateway

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use spyt_core::domain::{JobDescriptor, SubmissionId};
use spyt_core::dto::rest::{
    CreateSubmissionRequest, CreateSubmissionResponse, KillSubmissionResponse,
    SubmissionStatusResponse,
};
use spyt_core::dto::transport::{Reply, Request};
use tracing::debug;

use crate::error::TransportError;
use crate::transport::Transport;

/// [`Transport`] over HTTP/JSON
///
/// Endpoints:
/// - `POST /v1/submissions/create`
/// - `GET /v1/submissions/status/{id}`
/// - `POST /v1/submissions/kill/{id}`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL of the gateway (e.g., "http://localhost:6066")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl HttpTransport {
    /// Create a new transport with a default HTTP client
    ///
    /// # Example
    /// ```
    /// use spyt_client::HttpTransport;
    ///
    /// let transport = HttpTransport::new("http://localhost:6066/");
    /// assert_eq!(transport.base_url(), "http://localhost:6066");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new transport with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a new transport whose requests give up after `timeout`
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Get the base URL of the gateway
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create(&self, descriptor: &JobDescriptor) -> Result<Reply, TransportError> {
        let url = format!("{}/v1/submissions/create", self.base_url);
        let body = CreateSubmissionRequest::from(descriptor);
        let response = self.client.post(&url).json(&body).send().await?;

        let created: CreateSubmissionResponse = self.handle_response(response).await?;
        match created.submission_id {
            Some(id) if created.success => Ok(Reply::Submitted(SubmissionId::new(id))),
            _ => Err(TransportError::Rejected(
                created
                    .message
                    .unwrap_or_else(|| "gateway did not accept the submission".to_string()),
            )),
        }
    }

    async fn status(&self, id: &SubmissionId) -> Result<Reply, TransportError> {
        let url = self.submission_url("status", id)?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Reply::NotFound(id.clone()));
        }

        let status: SubmissionStatusResponse = self.handle_response(response).await?;
        if !status.success {
            debug!(
                "Gateway reports no submission {}: {}",
                id,
                status.message.as_deref().unwrap_or("no message")
            );
            return Ok(Reply::NotFound(id.clone()));
        }

        Ok(Reply::Status(status.driver_state))
    }

    async fn kill(&self, id: &SubmissionId) -> Result<Reply, TransportError> {
        let url = self.submission_url("kill", id)?;
        let response = self.client.post(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Reply::NotFound(id.clone()));
        }

        let killed: KillSubmissionResponse = self.handle_response(response).await?;
        Ok(Reply::Killed(killed.success))
    }

    /// `{base}/v1/submissions/{action}/{id}` with the id escaped as one path segment
    fn submission_url(&self, action: &str, id: &SubmissionId) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            TransportError::Other(format!("invalid gateway URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                TransportError::Other(format!("gateway URL {} cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v1", "submissions", action, id.as_str()]);
        Ok(url)
    }

    /// Handle a gateway response and deserialize JSON
    ///
    /// Non-success status codes become [`TransportError::Status`].
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::status(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| TransportError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: Request) -> Result<Reply, TransportError> {
        debug!("Sending {} request to {}", request.operation(), self.base_url);
        match &request {
            Request::Submit(descriptor) => self.create(descriptor).await,
            Request::Status(id) => self.status(id).await,
            Request::Kill(id) => self.kill(id).await,
        }
    }
}
