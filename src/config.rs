//! CLI configuration and argument parsing.

use clap::Parser;

use crate::error::HyupError;
use crate::upgrade::engine::DEFAULT_SETUP_PACKAGE_PREFIX;
use crate::upgrade::kernel::KernelMatch;
use crate::upgrade::orchestrator::UpgradeConfig;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMMIT: &str = env!("BUILD_COMMIT");
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Staged in-place upgrade of an oVirt/RHV engine host.
///
/// Verifies the host's channel subscriptions for its current version, applies
/// pending maintenance updates and switches channels to the next version,
/// one version at a time.
#[derive(Parser, Debug, Clone)]
#[command(name = "engine-hyper-upgrade")]
#[command(about = "Staged in-place upgrade of an oVirt/RHV engine host")]
#[command(version = const_format::formatcp!(
    "{} (commit: {}, build date: {})",
    VERSION, COMMIT, BUILD_DATE
))]
pub struct Args {
    /// Print the enabled software channels and exit
    #[arg(long)]
    pub list_enabled_repos: bool,

    /// Upgrade to RHV 4.1 if the host is on RHV 4.0
    #[arg(long = "check-upgrade-rhv-4-0")]
    pub check_upgrade_rhv_4_0: bool,

    /// Upgrade to RHV 4.2 if the host is on RHV 4.1
    #[arg(long = "check-upgrade-rhv-4-1")]
    pub check_upgrade_rhv_4_1: bool,

    /// Skip confirmation prompts
    #[arg(short, long, default_value = "false")]
    pub yes: bool,

    /// Show what would be done without changing the host
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Name prefix of the engine setup packages
    #[arg(long, default_value = DEFAULT_SETUP_PACKAGE_PREFIX, env = "HYUP_SETUP_PACKAGE_PREFIX")]
    pub setup_package_prefix: String,

    /// How package update output is scanned for a kernel update
    #[arg(long, value_enum, default_value_t = KernelMatch::Substring)]
    pub kernel_match: KernelMatch,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "HYUP_LOG_LEVEL")]
    pub log_level: String,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListEnabledRepos,
    /// Run the upgrade workflow for these versions.
    CheckUpgrade(Vec<String>),
}

/// Application configuration derived from CLI args.
#[derive(Debug, Clone)]
pub struct Config {
    pub list_enabled_repos: bool,
    pub check_versions: Vec<String>,
    pub yes: bool,
    pub dry_run: bool,
    pub setup_package_prefix: String,
    pub kernel_match: KernelMatch,
    pub log_level: String,
}

impl Config {
    /// Create config from CLI arguments.
    pub fn from_args(args: Args) -> Self {
        let check_versions = [
            (args.check_upgrade_rhv_4_0, "4.0"),
            (args.check_upgrade_rhv_4_1, "4.1"),
        ]
        .into_iter()
        .filter(|(requested, _)| *requested)
        .map(|(_, version)| version.to_string())
        .collect();

        Self {
            list_enabled_repos: args.list_enabled_repos,
            check_versions,
            yes: args.yes,
            dry_run: args.dry_run,
            setup_package_prefix: args.setup_package_prefix,
            kernel_match: args.kernel_match,
            log_level: args.log_level,
        }
    }

    /// Resolve the requested action, rejecting empty or conflicting flags.
    pub fn action(&self) -> Result<Action, HyupError> {
        match (self.list_enabled_repos, self.check_versions.is_empty()) {
            (true, true) => Ok(Action::ListEnabledRepos),
            (false, false) => Ok(Action::CheckUpgrade(self.check_versions.clone())),
            (true, false) => Err(HyupError::InvalidInvocation(
                "--list-enabled-repos cannot be combined with --check-upgrade-rhv-* flags"
                    .to_string(),
            )),
            (false, true) => Err(HyupError::InvalidInvocation(
                "no action given, use --list-enabled-repos, --check-upgrade-rhv-4-0 or --check-upgrade-rhv-4-1"
                    .to_string(),
            )),
        }
    }

    pub fn upgrade_config(&self) -> UpgradeConfig {
        UpgradeConfig {
            dry_run: self.dry_run,
            kernel_match: self.kernel_match,
            setup_package_prefix: self.setup_package_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Config {
        let args = Args::try_parse_from(std::iter::once("engine-hyper-upgrade").chain(argv.iter().copied()))
            .expect("valid arguments");
        Config::from_args(args)
    }

    #[test]
    fn test_list_enabled_repos_action() {
        let config = parse(&["--list-enabled-repos"]);
        assert_eq!(config.action().unwrap(), Action::ListEnabledRepos);
    }

    #[test]
    fn test_check_upgrade_action() {
        let config = parse(&["--check-upgrade-rhv-4-0"]);
        assert_eq!(
            config.action().unwrap(),
            Action::CheckUpgrade(vec!["4.0".to_string()])
        );
    }

    #[test]
    fn test_combined_check_flags_keep_chain_order() {
        let config = parse(&["--check-upgrade-rhv-4-1", "--check-upgrade-rhv-4-0"]);
        assert_eq!(
            config.action().unwrap(),
            Action::CheckUpgrade(vec!["4.0".to_string(), "4.1".to_string()])
        );
    }

    #[test]
    fn test_no_action_is_invalid_invocation() {
        let config = parse(&[]);
        assert!(matches!(
            config.action(),
            Err(HyupError::InvalidInvocation(_))
        ));
    }

    #[test]
    fn test_list_with_check_is_invalid_invocation() {
        let config = parse(&["--list-enabled-repos", "--check-upgrade-rhv-4-1"]);
        assert!(matches!(
            config.action(),
            Err(HyupError::InvalidInvocation(_))
        ));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let result = Args::try_parse_from(["engine-hyper-upgrade", "--check-upgrade-rhv-3-6"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--check-upgrade-rhv-4-0"]);
        assert!(!config.yes);
        assert!(!config.dry_run);
        assert_eq!(config.kernel_match, KernelMatch::Substring);
        assert_eq!(config.setup_package_prefix, "ovirt-engine-setup");

        let upgrade = config.upgrade_config();
        assert!(!upgrade.dry_run);
        assert_eq!(upgrade.setup_package_prefix, "ovirt-engine-setup");
    }

    #[test]
    fn test_upgrade_config_from_flags() {
        let config = parse(&[
            "--check-upgrade-rhv-4-1",
            "--dry-run",
            "--yes",
            "--kernel-match",
            "package",
            "--setup-package-prefix",
            "rhevm-setup",
        ]);
        let upgrade = config.upgrade_config();
        assert!(config.yes);
        assert!(upgrade.dry_run);
        assert_eq!(upgrade.kernel_match, KernelMatch::Package);
        assert_eq!(upgrade.setup_package_prefix, "rhevm-setup");
    }
}
