//! Operator consent before mutating the host.

use anyhow::Result;
use dialoguer::{Confirm, theme::ColorfulTheme};

use super::profile::VersionProfile;

/// Decides whether the upgrade of a version may proceed.
pub trait Approval {
    fn approve(&self, profile: &VersionProfile) -> Result<bool>;
}

/// Approves everything (`--yes`).
pub struct AutoApprove;

impl Approval for AutoApprove {
    fn approve(&self, _profile: &VersionProfile) -> Result<bool> {
        Ok(true)
    }
}

/// Asks on the terminal.
pub struct InteractiveApproval;

impl Approval for InteractiveApproval {
    fn approve(&self, profile: &VersionProfile) -> Result<bool> {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Upgrade this host from {} to {}? Channels will be switched and engine-setup will run",
                profile.version, profile.next_version
            ))
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}
