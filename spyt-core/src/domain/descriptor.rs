//! Job descriptor domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reference to a credential held by an external store
///
/// Only the reference travels with the descriptor; resolving it is the job of
/// whatever sits behind the transport. `Debug` hides the reference so that
/// descriptors can be logged freely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRef(String);

impl CredentialRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The raw reference, for transports that have to forward it
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialRef(***)")
    }
}

/// Immutable description of a job to submit
///
/// Built once through [`JobDescriptor::builder`] and never mutated afterwards.
/// The builder does not validate; `SubmissionClient::submit` rejects a
/// descriptor with a blank resource or entry point before touching the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    app_resource: String,
    entry_point: String,
    cluster: Option<String>,
    discovery_path: Option<String>,
    client_version: Option<String>,
    #[serde(default)]
    app_args: Vec<String>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    #[serde(default)]
    credentials: BTreeMap<String, CredentialRef>,
}

impl JobDescriptor {
    pub fn builder() -> JobDescriptorBuilder {
        JobDescriptorBuilder::default()
    }

    /// URI of the application artifact (e.g. `yt:///home/spark/job.jar`)
    pub fn app_resource(&self) -> &str {
        &self.app_resource
    }

    /// Main class or other entry point identifier
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Cluster address the job targets
    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    /// Discovery path (working directory) of the compute cluster
    pub fn discovery_path(&self) -> Option<&str> {
        self.discovery_path.as_deref()
    }

    pub fn client_version(&self) -> Option<&str> {
        self.client_version.as_deref()
    }

    pub fn app_args(&self) -> &[String] {
        &self.app_args
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn credentials(&self) -> &BTreeMap<String, CredentialRef> {
        &self.credentials
    }

    /// Checks the fields required before any request is made
    ///
    /// Returns a human readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.app_resource.trim().is_empty() {
            return Err("app resource must not be empty".to_string());
        }

        if self.entry_point.trim().is_empty() {
            return Err("entry point must not be empty".to_string());
        }

        Ok(())
    }
}

/// Builder for [`JobDescriptor`]
#[derive(Debug, Default, Clone)]
pub struct JobDescriptorBuilder {
    app_resource: String,
    entry_point: String,
    cluster: Option<String>,
    discovery_path: Option<String>,
    client_version: Option<String>,
    app_args: Vec<String>,
    properties: BTreeMap<String, String>,
    credentials: BTreeMap<String, CredentialRef>,
}

impl JobDescriptorBuilder {
    pub fn app_resource(mut self, uri: impl Into<String>) -> Self {
        self.app_resource = uri.into();
        self
    }

    pub fn entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    pub fn cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn discovery_path(mut self, path: impl Into<String>) -> Self {
        self.discovery_path = Some(path.into());
        self
    }

    pub fn client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = Some(version.into());
        self
    }

    /// Appends one application argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.app_args.push(arg.into());
        self
    }

    /// Sets one job property, replacing a previous value for the same key
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds a named credential reference (e.g. `"token"` → `"env:YT_TOKEN"`)
    pub fn credential(mut self, name: impl Into<String>, reference: CredentialRef) -> Self {
        self.credentials.insert(name.into(), reference);
        self
    }

    pub fn build(self) -> JobDescriptor {
        JobDescriptor {
            app_resource: self.app_resource,
            entry_point: self.entry_point,
            cluster: self.cluster,
            discovery_path: self.discovery_path,
            client_version: self.client_version,
            app_args: self.app_args,
            properties: self.properties,
            credentials: self.credentials,
        }
    }
}
