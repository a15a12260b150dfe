//! Supported versions and their channel requirements.

use crate::channel::types::ChannelSet;
use crate::error::HyupError;

/// Channels shared by every supported version.
const BASE_CHANNELS: [&str; 3] = [
    "rhel-7-server-supplementary-rpms",
    "rhel-7-server-rpms",
    "jb-eap-7-for-rhel-7-server-rpms",
];

/// Static description of one version in the migration chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionProfile {
    pub version: &'static str,
    /// Version-specific channel, required together with the base channels.
    pub channel: &'static str,
    /// Channel enabled to advance past this version.
    pub advance_channel: &'static str,
    /// Channel disabled once advanced.
    pub retire_channel: &'static str,
    pub next_version: &'static str,
    /// Post-upgrade tasks for the next version.
    pub upgrade_guide: &'static str,
}

impl VersionProfile {
    pub fn required_channels(&self) -> ChannelSet {
        BASE_CHANNELS
            .iter()
            .copied()
            .chain(std::iter::once(self.channel))
            .collect()
    }
}

/// Migration chain, oldest first.
pub static PROFILES: [VersionProfile; 2] = [
    VersionProfile {
        version: "4.0",
        channel: "rhel-7-server-rhv-4.0-rpms",
        advance_channel: "rhel-7-server-rhv-4.1-rpms",
        retire_channel: "rhel-7-server-rhv-4.0-rpms",
        next_version: "4.1",
        upgrade_guide: "https://access.redhat.com/documentation/en/red-hat-virtualization/4.1/single/upgrade-guide#chap-Post-Upgrade_Tasks",
    },
    VersionProfile {
        version: "4.1",
        channel: "rhel-7-server-rhv-4.1-rpms",
        advance_channel: "rhel-7-server-rhv-4.2-rpms",
        retire_channel: "rhel-7-server-rhv-4.1-rpms",
        next_version: "4.2",
        upgrade_guide: "https://access.redhat.com/documentation/en/red-hat-virtualization/4.2/single/upgrade-guide#chap-Post-Upgrade_Tasks",
    },
];

/// Look up the profile for a version.
pub fn find(version: &str) -> Result<&'static VersionProfile, HyupError> {
    PROFILES
        .iter()
        .find(|p| p.version == version)
        .ok_or_else(|| HyupError::UnsupportedVersion(version.to_string()))
}

/// Resolve requested versions into profiles in chain order, without duplicates.
pub fn select<S: AsRef<str>>(versions: &[S]) -> Result<Vec<&'static VersionProfile>, HyupError> {
    for version in versions {
        find(version.as_ref())?;
    }

    Ok(PROFILES
        .iter()
        .filter(|p| versions.iter().any(|v| v.as_ref() == p.version))
        .collect())
}
