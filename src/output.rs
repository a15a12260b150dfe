//! Console output for the operator.

use colored::Colorize;

use crate::channel::compliance::ComplianceResult;
use crate::channel::manager::ChannelListing;
use crate::upgrade::orchestrator::{RunReport, VersionOutcome};
use crate::upgrade::profile::VersionProfile;

/// Print enabled channels, or the raw listing when nothing could be parsed.
pub fn print_channel_listing(listing: &ChannelListing) {
    if listing.channels.is_empty() {
        println!("{}", "No enabled channels parsed. Raw output:".yellow());
        println!("{}", listing.raw.trim_end());
        return;
    }

    println!("{}", "Enabled channels:".bold());
    println!("{}", "-".repeat(40));
    for channel in listing.channels.iter() {
        println!("  {channel}");
    }
}

/// Print a version header in "=== RHV <version> ===" format.
pub fn print_version_header(profile: &VersionProfile) {
    println!();
    println!(
        "{}",
        format!(
            "=== RHV {} -> {} ===",
            profile.version, profile.next_version
        )
        .cyan()
        .bold()
    );
}

/// Print the compliance verdict with missing and unexpected channels.
pub fn print_compliance(profile: &VersionProfile, result: &ComplianceResult) {
    if result.is_compliant() {
        println!(
            "  {} Channels match RHV {}",
            "✓".green(),
            profile.version
        );
        return;
    }

    if !result.missing.is_empty() {
        println!(
            "  {} The following channels are required for RHV {}:",
            "✗".red(),
            profile.version
        );
        for channel in result.missing.iter() {
            println!("    - {channel}");
        }
    }
    if !result.unexpected.is_empty() {
        println!(
            "  {} The following channels are enabled and not supported for RHV {}:",
            "⚠".yellow(),
            profile.version
        );
        for channel in result.unexpected.iter() {
            println!("    - {channel}");
        }
    }
    println!(
        "  {} Host is not on RHV {}, skipping",
        "→".cyan(),
        profile.version
    );
}

/// Print the steps a real run would perform.
pub fn print_plan(profile: &VersionProfile, update_available: bool) {
    println!("{}", "[DRY RUN] Would execute:".yellow());
    let mut step = 1;
    if update_available {
        println!(
            "  Step {step}: update setup packages, run engine-setup, update system (latest {}.z)",
            profile.version
        );
        step += 1;
    }
    println!("  Step {step}: enable {}", profile.advance_channel);
    println!(
        "  Step {}: update setup packages, run engine-setup, update system",
        step + 1
    );
    println!("  Step {}: disable {}", step + 2, profile.retire_channel);
}

/// Print the notice for a kernel update that requires a reboot.
pub fn print_reboot_required() {
    println!();
    println!(
        "{}",
        "A kernel update has been installed, please reboot the system to complete the update."
            .yellow()
            .bold()
    );
    println!(
        "  {} Re-run this command after the reboot to continue",
        "→".cyan()
    );
}

/// Print post-upgrade instructions after a channel migration.
pub fn print_post_upgrade(profile: &VersionProfile) {
    println!();
    println!(
        "{}",
        format!(
            "Upgrade to RHV {} complete. Please reboot the system to complete the update.",
            profile.next_version
        )
        .green()
        .bold()
    );
    println!(
        "  {} Once rebooted, change the cluster and datacenter compatibility level to {}",
        "→".cyan(),
        profile.next_version
    );
    println!("    See Post-Upgrade Tasks: {}", profile.upgrade_guide.dimmed());
}

/// Print the final summary of a run.
pub fn print_summary(report: &RunReport) {
    println!();
    println!("{}", "=".repeat(60));
    for (version, outcome) in &report.versions {
        let line = match outcome {
            VersionOutcome::Skipped(result) => format!(
                "RHV {version}: skipped ({} missing, {} unexpected channel(s))",
                result.missing.len(),
                result.unexpected.len()
            ),
            VersionOutcome::Planned { update_available } => {
                let update = if *update_available {
                    "maintenance update available"
                } else {
                    "no maintenance update"
                };
                format!("RHV {version}: planned (dry run, {update})")
            }
            VersionOutcome::HaltedForReboot => {
                format!("RHV {version}: halted, reboot required")
            }
            VersionOutcome::Migrated { next_version, .. } => {
                format!("RHV {version}: migrated to {next_version}")
            }
        };
        println!("  {line}");
    }
    if report.versions.iter().all(|(_, o)| matches!(o, VersionOutcome::Skipped(_))) {
        println!(
            "  {} Host matched none of the requested versions, nothing to do",
            "→".cyan()
        );
    }
    println!("{}", "=".repeat(60));
}
