//! SPYT Launcher
//!
//! Submits one job to a Spark-over-YT cluster and follows it until it reaches
//! a terminal state.
//!
//! Architecture:
//! - Configuration: job, gateway and polling settings from `SPYT_*` variables
//! - Launch: submit, poll with backoff, kill on Ctrl-C
//!
//! The process exits with status 0 only when the job finished successfully.

mod config;
mod launch;

use std::process::ExitCode;

use anyhow::{Context, Result};
use spyt_client::{CancelHandle, HttpTransport, SubmissionClient};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::launch::Launcher;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spyt_launcher=info,spyt_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SPYT launcher");

    let config = load_config()?;
    info!(
        "Loaded configuration: endpoint={}, main_class={}, app_resource={}",
        config.endpoint, config.main_class, config.app_resource
    );

    let transport = HttpTransport::with_timeout(config.endpoint.clone(), config.request_timeout)
        .context("Failed to build HTTP transport")?;
    let client = SubmissionClient::new(transport);

    let cancel = CancelHandle::new();
    let token = cancel.token();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupted, cancelling");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let outcome = Launcher::new(config, client).run(token).await?;

    println!("{}", outcome.state);
    println!("success: {}", outcome.state.is_success());
    println!("failure: {}", outcome.state.is_failure());

    Ok(if outcome.state.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Loads and validates configuration from environment variables
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}
