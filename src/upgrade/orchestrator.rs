//! Version upgrade workflow.
//!
//! Each selected version walks through
//! `CheckingCompliance -> CheckingUpdate -> ApplyingUpdate -> MigratingChannels`.
//! A version whose channels do not match is skipped, a kernel update stops the
//! whole run so the host can be rebooted, and versions are processed oldest
//! first so that a migration is visible to the next compliance check.

use anyhow::Result;
use tracing::{debug, info, warn};

use super::approval::Approval;
use super::engine::{DEFAULT_SETUP_PACKAGE_PREFIX, EngineHost};
use super::kernel::KernelMatch;
use super::profile::VersionProfile;
use crate::channel::compliance::ComplianceResult;
use crate::channel::manager::ChannelManager;
use crate::error::HyupError;
use crate::host::CommandRunner;
use crate::output;

/// Result of a maintenance update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    NoUpdateAvailable,
    UpdatedNoKernelChange,
    /// The host must be rebooted before going further.
    UpdatedKernelChanged,
}

/// Terminal state of one version's workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    /// Host channels do not match this version.
    Skipped(ComplianceResult),
    /// Dry run: compliant, nothing executed.
    Planned { update_available: bool },
    HaltedForReboot,
    Migrated {
        next_version: &'static str,
        kernel_updated: bool,
    },
}

/// Outcomes of one invocation, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub versions: Vec<(&'static str, VersionOutcome)>,
    pub halted: bool,
}

/// Configuration for workflow execution.
#[derive(Debug, Clone)]
pub struct UpgradeConfig {
    pub dry_run: bool,
    pub kernel_match: KernelMatch,
    pub setup_package_prefix: String,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            kernel_match: KernelMatch::default(),
            setup_package_prefix: DEFAULT_SETUP_PACKAGE_PREFIX.to_string(),
        }
    }
}

/// Non-terminal workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    CheckingCompliance,
    CheckingUpdate,
    ApplyingUpdate,
    MigratingChannels,
}

/// Drives the per-version upgrade workflow.
pub struct Orchestrator<'a> {
    channels: ChannelManager<'a>,
    engine: EngineHost<'a>,
    approval: &'a dyn Approval,
    config: UpgradeConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        approval: &'a dyn Approval,
        config: UpgradeConfig,
    ) -> Self {
        Self {
            channels: ChannelManager::new(runner),
            engine: EngineHost::new(runner, config.setup_package_prefix.clone()),
            approval,
            config,
        }
    }

    /// Run the workflow for each profile in order, stopping at a kernel update.
    pub async fn run(&self, profiles: &[&'static VersionProfile]) -> Result<RunReport> {
        let mut report = RunReport::default();

        for profile in profiles {
            output::print_version_header(profile);
            let outcome = self.run_version(profile).await?;

            match &outcome {
                VersionOutcome::HaltedForReboot => {
                    warn!(
                        "Kernel updated during RHV {} maintenance update, halting",
                        profile.version
                    );
                    output::print_reboot_required();
                    report.halted = true;
                }
                VersionOutcome::Migrated { kernel_updated, .. } => {
                    if *kernel_updated {
                        info!("Kernel updated during channel migration");
                    }
                    output::print_post_upgrade(profile);
                }
                VersionOutcome::Skipped(_) | VersionOutcome::Planned { .. } => {}
            }

            report.versions.push((profile.version, outcome));
            if report.halted {
                break;
            }
        }

        Ok(report)
    }

    /// Run one version's workflow to a terminal state.
    pub async fn run_version(&self, profile: &VersionProfile) -> Result<VersionOutcome> {
        let mut step = Step::CheckingCompliance;

        loop {
            debug!("RHV {}: {:?}", profile.version, step);

            step = match step {
                Step::CheckingCompliance => {
                    let compliance = self.check_compliance(profile).await?;
                    if !compliance.is_compliant() {
                        return Ok(VersionOutcome::Skipped(compliance));
                    }
                    Step::CheckingUpdate
                }
                Step::CheckingUpdate => {
                    let update_available = self.engine.check_update_available().await?;

                    if self.config.dry_run {
                        output::print_plan(profile, update_available);
                        return Ok(VersionOutcome::Planned { update_available });
                    }

                    if !self.approval.approve(profile)? {
                        return Err(HyupError::UserCancelled.into());
                    }

                    if update_available {
                        println!(
                            "An upgrade is available, upgrading to latest {}.z",
                            profile.version
                        );
                        Step::ApplyingUpdate
                    } else {
                        Step::MigratingChannels
                    }
                }
                Step::ApplyingUpdate => match self.apply_maintenance_update().await? {
                    UpgradeOutcome::UpdatedKernelChanged => {
                        return Ok(VersionOutcome::HaltedForReboot);
                    }
                    UpgradeOutcome::NoUpdateAvailable | UpgradeOutcome::UpdatedNoKernelChange => {
                        Step::MigratingChannels
                    }
                },
                Step::MigratingChannels => {
                    let kernel_updated = self.migrate_channels(profile).await?;
                    return Ok(VersionOutcome::Migrated {
                        next_version: profile.next_version,
                        kernel_updated,
                    });
                }
            };
        }
    }

    /// Compare freshly queried channels with the profile's required set.
    pub async fn check_compliance(&self, profile: &VersionProfile) -> Result<ComplianceResult> {
        let enabled = self.channels.list_enabled().await?;
        let result = ComplianceResult::evaluate(&enabled, &profile.required_channels());

        if !result.is_compliant() {
            warn!(
                "Channels do not match RHV {}: missing {}, unexpected {}",
                profile.version, result.missing, result.unexpected
            );
        }
        output::print_compliance(profile, &result);

        Ok(result)
    }

    /// Update setup packages, re-run setup, then update the whole system.
    pub async fn apply_maintenance_update(&self) -> Result<UpgradeOutcome> {
        let setup_packages = self.engine.setup_packages().await?;
        if setup_packages.is_empty() {
            info!(
                "No installed packages match {}, skipping maintenance update",
                self.config.setup_package_prefix
            );
            return Ok(UpgradeOutcome::NoUpdateAvailable);
        }

        let updated = self.refresh_engine(&setup_packages).await?;

        if self.config.kernel_match.detects(&updated) {
            Ok(UpgradeOutcome::UpdatedKernelChanged)
        } else {
            Ok(UpgradeOutcome::UpdatedNoKernelChange)
        }
    }

    /// Switch to the next version's channel and bring the engine up to it.
    ///
    /// Returns true when the migration update installed a kernel.
    pub async fn migrate_channels(&self, profile: &VersionProfile) -> Result<bool> {
        info!(
            "Migrating channels: {} -> {}",
            profile.retire_channel, profile.advance_channel
        );
        self.channels.enable(&[profile.advance_channel]).await?;

        let setup_packages = self.engine.setup_packages().await?;
        let updated = self.refresh_engine(&setup_packages).await?;

        self.channels.disable(&[profile.retire_channel]).await?;

        Ok(self.config.kernel_match.detects(&updated))
    }

    /// Returns the combined output of both package updates.
    async fn refresh_engine(&self, setup_packages: &[String]) -> Result<String> {
        let mut updated = String::new();

        if !setup_packages.is_empty() {
            updated.push_str(&self.engine.update_packages(setup_packages).await?);
            updated.push('\n');
        }
        self.engine.run_setup().await?;
        updated.push_str(&self.engine.update_system().await?);

        Ok(updated)
    }
}
