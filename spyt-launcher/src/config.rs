//! Launcher configuration
//!
//! Defines the job to submit, the gateway to talk to and the polling policy.
//! Everything is read from `SPYT_*` environment variables.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use spyt_client::PollConfig;
use spyt_core::domain::{CredentialRef, JobDescriptor};

/// Launcher configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Submission gateway base URL (e.g., "http://localhost:6066")
    pub endpoint: String,

    /// URI of the application artifact
    pub app_resource: String,

    /// Entry point (main class) of the application
    pub main_class: String,

    /// Cluster the job targets
    pub cluster: Option<String>,

    /// Discovery path of the compute cluster
    pub discovery_path: Option<String>,

    /// Client version reported with the submission
    pub client_version: Option<String>,

    /// Whitespace separated application arguments
    pub app_args: Vec<String>,

    /// Name of the credential reference for the user
    pub credential_user: Option<String>,

    /// Name of the credential reference for the token
    pub credential_token: Option<String>,

    /// Timeout of a single HTTP request
    pub request_timeout: Duration,

    /// Delay between status requests
    pub poll_interval: Duration,

    /// Consecutive failed status requests tolerated
    pub max_retries: u32,

    /// Backoff growth factor after failed status requests
    pub backoff_multiplier: f64,

    /// Overall polling budget
    pub timeout: Option<Duration>,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - SPYT_ENDPOINT (required)
    /// - SPYT_APP_RESOURCE (required)
    /// - SPYT_MAIN_CLASS (required)
    /// - SPYT_CLUSTER, SPYT_DISCOVERY_PATH, SPYT_VERSION (optional)
    /// - SPYT_APP_ARGS (optional, whitespace separated)
    /// - SPYT_CREDENTIAL_USER, SPYT_CREDENTIAL_TOKEN (optional, reference names)
    /// - SPYT_REQUEST_TIMEOUT (optional, seconds, default: 30)
    /// - SPYT_POLL_INTERVAL (optional, seconds, default: 2)
    /// - SPYT_MAX_RETRIES (optional, default: 5)
    /// - SPYT_BACKOFF_MULTIPLIER (optional, default: 2.0)
    /// - SPYT_TIMEOUT (optional, seconds, no default)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required =
            |key: &str| var(key).ok_or_else(|| anyhow!("{key} environment variable not set"));
        let seconds = |key: &str| -> Result<Option<Duration>> {
            var(key)
                .map(|value| {
                    value
                        .trim()
                        .parse::<u64>()
                        .map(Duration::from_secs)
                        .with_context(|| format!("{key} must be a whole number of seconds"))
                })
                .transpose()
        };

        let defaults = PollConfig::default();

        let max_retries = var("SPYT_MAX_RETRIES")
            .map(|value| value.trim().parse::<u32>())
            .transpose()
            .context("SPYT_MAX_RETRIES must be a non-negative integer")?
            .unwrap_or(defaults.max_retries);

        let backoff_multiplier = var("SPYT_BACKOFF_MULTIPLIER")
            .map(|value| value.trim().parse::<f64>())
            .transpose()
            .context("SPYT_BACKOFF_MULTIPLIER must be a number")?
            .unwrap_or(defaults.backoff_multiplier);

        Ok(Self {
            endpoint: required("SPYT_ENDPOINT")?,
            app_resource: required("SPYT_APP_RESOURCE")?,
            main_class: required("SPYT_MAIN_CLASS")?,
            cluster: var("SPYT_CLUSTER"),
            discovery_path: var("SPYT_DISCOVERY_PATH"),
            client_version: var("SPYT_VERSION"),
            app_args: var("SPYT_APP_ARGS")
                .map(|args| args.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            credential_user: var("SPYT_CREDENTIAL_USER"),
            credential_token: var("SPYT_CREDENTIAL_TOKEN"),
            request_timeout: seconds("SPYT_REQUEST_TIMEOUT")?.unwrap_or(Duration::from_secs(30)),
            poll_interval: seconds("SPYT_POLL_INTERVAL")?.unwrap_or(defaults.interval),
            max_retries,
            backoff_multiplier,
            timeout: seconds("SPYT_TIMEOUT")?,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            bail!("endpoint must start with http:// or https://");
        }

        if self.request_timeout.is_zero() {
            bail!("request_timeout must be greater than 0");
        }

        self.poll_config()
            .validate()
            .context("invalid polling settings")?;

        self.descriptor()
            .validate()
            .map_err(|reason| anyhow!("invalid job: {reason}"))?;

        Ok(())
    }

    /// Builds the job descriptor to submit
    pub fn descriptor(&self) -> JobDescriptor {
        let mut builder = JobDescriptor::builder()
            .app_resource(&self.app_resource)
            .entry_point(&self.main_class);

        if let Some(cluster) = &self.cluster {
            builder = builder.cluster(cluster);
        }
        if let Some(path) = &self.discovery_path {
            builder = builder.discovery_path(path);
        }
        if let Some(version) = &self.client_version {
            builder = builder.client_version(version);
        }
        for arg in &self.app_args {
            builder = builder.arg(arg);
        }
        if let Some(user) = &self.credential_user {
            builder = builder.credential("user", CredentialRef::new(user));
        }
        if let Some(token) = &self.credential_token {
            builder = builder.credential("token", CredentialRef::new(token));
        }

        builder.build()
    }

    /// Polling policy without cancellation; the caller attaches its own token
    pub fn poll_config(&self) -> PollConfig {
        let mut config = PollConfig::default()
            .with_interval(self.poll_interval)
            .with_max_retries(self.max_retries)
            .with_backoff_multiplier(self.backoff_multiplier);
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("SPYT_ENDPOINT", "http://localhost:6066"),
        ("SPYT_APP_RESOURCE", "yt:///home/spark/examples/job.jar"),
        ("SPYT_MAIN_CLASS", "tech.ytsaurus.spark.example.SmokeTest"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.backoff_multiplier, 2.0);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.timeout.is_none());
        assert!(config.app_args.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_required_variable() {
        let err = load(&REQUIRED[..2]).unwrap_err();
        assert!(err.to_string().contains("SPYT_MAIN_CLASS"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("SPYT_CLUSTER", "hahn"),
            ("SPYT_DISCOVERY_PATH", "//home/test/spark-discovery"),
            ("SPYT_APP_ARGS", "--date 2024-01-01"),
            ("SPYT_POLL_INTERVAL", "10"),
            ("SPYT_MAX_RETRIES", "3"),
            ("SPYT_BACKOFF_MULTIPLIER", "1.5"),
            ("SPYT_TIMEOUT", "600"),
            ("SPYT_CREDENTIAL_TOKEN", "env:YT_TOKEN"),
        ]);
        let config = load(&vars).unwrap();

        let poll = config.poll_config();
        assert_eq!(poll.interval, Duration::from_secs(10));
        assert_eq!(poll.max_retries, 3);
        assert_eq!(poll.backoff_multiplier, 1.5);
        assert_eq!(poll.timeout, Some(Duration::from_secs(600)));

        let descriptor = config.descriptor();
        assert_eq!(descriptor.cluster(), Some("hahn"));
        assert_eq!(descriptor.app_args(), ["--date", "2024-01-01"]);
        assert_eq!(
            descriptor.credentials()["token"].expose(),
            "env:YT_TOKEN"
        );
        assert!(!descriptor.credentials().contains_key("user"));
    }

    #[test]
    fn test_malformed_numbers_are_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SPYT_POLL_INTERVAL", "two"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = load(&REQUIRED).unwrap();
        assert!(config.validate().is_ok());

        config.endpoint = "localhost:6066".to_string();
        assert!(config.validate().is_err());
        config.endpoint = "https://spyt.example.com".to_string();

        config.max_retries = 0;
        assert!(config.validate().is_err());
        config.max_retries = 5;

        config.main_class = " ".to_string();
        assert!(config.validate().is_err());
    }
}
