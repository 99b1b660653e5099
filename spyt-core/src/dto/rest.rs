//! REST submission gateway bodies
//!
//! Field names follow the Spark standalone REST submission protocol
//! (`/v1/submissions/...`), which is what the cluster's submission gateway speaks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::JobDescriptor;

/// Body of `POST /v1/submissions/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub action: String,
    pub app_resource: String,
    pub main_class: String,
    pub app_args: Vec<String>,
    pub spark_properties: BTreeMap<String, String>,
    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_spark_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_path: Option<String>,
    /// Credential name → reference; the gateway resolves the references
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub credential_refs: BTreeMap<String, String>,
}

impl From<&JobDescriptor> for CreateSubmissionRequest {
    fn from(descriptor: &JobDescriptor) -> Self {
        Self {
            action: "CreateSubmissionRequest".to_string(),
            app_resource: descriptor.app_resource().to_string(),
            main_class: descriptor.entry_point().to_string(),
            app_args: descriptor.app_args().to_vec(),
            spark_properties: descriptor.properties().clone(),
            environment_variables: BTreeMap::new(),
            client_spark_version: descriptor.client_version().map(str::to_string),
            cluster: descriptor.cluster().map(str::to_string),
            discovery_path: descriptor.discovery_path().map(str::to_string),
            credential_refs: descriptor
                .credentials()
                .iter()
                .map(|(name, reference)| (name.clone(), reference.expose().to_string()))
                .collect(),
        }
    }
}

/// Response of `POST /v1/submissions/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionResponse {
    #[serde(default)]
    pub submission_id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub server_spark_version: Option<String>,
}

/// Response of `GET /v1/submissions/status/{id}`
///
/// `success == false` means the gateway does not know the submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStatusResponse {
    #[serde(default)]
    pub submission_id: Option<String>,
    #[serde(default)]
    pub driver_state: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /v1/submissions/kill/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillSubmissionResponse {
    #[serde(default)]
    pub submission_id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CredentialRef;

    #[test]
    fn test_create_request_from_descriptor() {
        let descriptor = JobDescriptor::builder()
            .app_resource("yt:///job.jar")
            .entry_point("com.example.Main")
            .cluster("hahn")
            .arg("42")
            .property("spark.executor.memory", "2g")
            .credential("user", CredentialRef::new("env:YT_USER"))
            .build();

        let body = serde_json::to_value(CreateSubmissionRequest::from(&descriptor)).unwrap();
        assert_eq!(body["action"], "CreateSubmissionRequest");
        assert_eq!(body["appResource"], "yt:///job.jar");
        assert_eq!(body["mainClass"], "com.example.Main");
        assert_eq!(body["appArgs"][0], "42");
        assert_eq!(body["sparkProperties"]["spark.executor.memory"], "2g");
        assert_eq!(body["cluster"], "hahn");
        assert_eq!(body["credentialRefs"]["user"], "env:YT_USER");
        assert!(body.get("discoveryPath").is_none());
        assert!(body.get("clientSparkVersion").is_none());
    }

    #[test]
    fn test_status_response_tolerates_missing_fields() {
        let response: SubmissionStatusResponse =
            serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert!(response.driver_state.is_none());

        let response: SubmissionStatusResponse = serde_json::from_str(
            r#"{"action":"SubmissionStatusResponse","driverState":"RUNNING","submissionId":"driver-1","success":true}"#,
        )
        .unwrap();
        assert_eq!(response.driver_state.as_deref(), Some("RUNNING"));
        assert_eq!(response.submission_id.as_deref(), Some("driver-1"));
    }
}
