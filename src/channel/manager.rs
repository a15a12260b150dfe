//! Channel queries and mutations through `subscription-manager`.

use anyhow::Result;
use tracing::{debug, info};

use super::types::ChannelSet;
use crate::host::{CommandRunner, HostCommand};

const SUBSCRIPTION_MANAGER: &str = "subscription-manager";

/// Key of the channel identifier field in `repos --list-enabled` output.
const REPO_ID_KEY: &str = "Repo ID";

/// Enabled channels together with the raw listing they were parsed from.
#[derive(Debug, Clone)]
pub struct ChannelListing {
    pub channels: ChannelSet,
    pub raw: String,
}

/// Lists, enables and disables software channels on the host.
pub struct ChannelManager<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> ChannelManager<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Query the host for enabled channels, keeping the raw output.
    pub async fn query(&self) -> Result<ChannelListing> {
        let cmd = HostCommand::new(SUBSCRIPTION_MANAGER).args(["repos", "--list-enabled"]);
        let output = self.runner.run_checked(&cmd).await?;
        let channels = parse_enabled(&output.stdout);
        debug!("Enabled channels: {}", channels);

        Ok(ChannelListing {
            channels,
            raw: output.stdout,
        })
    }

    /// Fetch a fresh set of enabled channels.
    pub async fn list_enabled(&self) -> Result<ChannelSet> {
        Ok(self.query().await?.channels)
    }

    /// Enable all given channels in a single invocation.
    pub async fn enable(&self, channels: &[&str]) -> Result<String> {
        self.toggle("--enable", channels).await
    }

    /// Disable all given channels in a single invocation.
    pub async fn disable(&self, channels: &[&str]) -> Result<String> {
        self.toggle("--disable", channels).await
    }

    async fn toggle(&self, flag: &str, channels: &[&str]) -> Result<String> {
        if channels.is_empty() {
            return Ok(String::new());
        }

        info!("subscription-manager repos {} {:?}", flag, channels);
        let cmd = HostCommand::new(SUBSCRIPTION_MANAGER)
            .arg("repos")
            .args(channels.iter().map(|c| format!("{flag}={c}")));
        let output = self.runner.run_checked(&cmd).await?;
        Ok(output.stdout)
    }
}

/// Collect `Repo ID` values from `key: value` lines.
///
/// Lines without a colon, other keys and empty values are ignored, so output
/// without any channel yields an empty set.
pub fn parse_enabled(output: &str) -> ChannelSet {
    output
        .lines()
        .filter_map(|line| line.split_once(':'))
        .filter(|(key, _)| key.trim() == REPO_ID_KEY)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .collect()
}
