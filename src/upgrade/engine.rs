//! Package and setup operations on the engine host.

use anyhow::Result;
use tracing::{debug, info};

use crate::host::{CommandRunner, HostCommand};

/// Default prefix of the engine setup packages.
pub const DEFAULT_SETUP_PACKAGE_PREFIX: &str = "ovirt-engine-setup";

/// Wraps `engine-upgrade-check`, `rpm`, `yum` and `engine-setup`.
pub struct EngineHost<'a> {
    runner: &'a dyn CommandRunner,
    setup_package_prefix: String,
}

impl<'a> EngineHost<'a> {
    pub fn new(runner: &'a dyn CommandRunner, setup_package_prefix: impl Into<String>) -> Self {
        Self {
            runner,
            setup_package_prefix: setup_package_prefix.into(),
        }
    }

    /// Returns true when `engine-upgrade-check` reports an available upgrade.
    ///
    /// Any non-empty output of a successful check means an upgrade is available.
    pub async fn check_update_available(&self) -> Result<bool> {
        let output = self
            .runner
            .run_checked(&HostCommand::new("engine-upgrade-check"))
            .await?;
        let available = !output.stdout.trim().is_empty();
        debug!("engine-upgrade-check: available={}", available);
        Ok(available)
    }

    /// Names of all installed packages.
    pub async fn installed_packages(&self) -> Result<Vec<String>> {
        let cmd = HostCommand::new("rpm").args(["-qa", "--queryformat", "%{NAME}\\n"]);
        let output = self.runner.run_checked(&cmd).await?;

        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    /// Installed packages whose name starts with the setup package prefix.
    pub async fn setup_packages(&self) -> Result<Vec<String>> {
        let mut packages: Vec<String> = self
            .installed_packages()
            .await?
            .into_iter()
            .filter(|name| name.starts_with(&self.setup_package_prefix))
            .collect();
        packages.sort();
        packages.dedup();
        debug!("Setup packages: {:?}", packages);
        Ok(packages)
    }

    /// Run `yum -y update`, restricted to `packages` unless empty.
    pub async fn update_packages(&self, packages: &[String]) -> Result<String> {
        if packages.is_empty() {
            info!("Updating all system packages");
        } else {
            info!("Updating packages: {}", packages.join(" "));
        }

        let cmd = HostCommand::new("yum")
            .args(["-y", "update"])
            .args(packages.iter().cloned());
        let output = self.runner.run_checked(&cmd).await?;
        Ok(output.stdout)
    }

    /// Full system update.
    pub async fn update_system(&self) -> Result<String> {
        self.update_packages(&[]).await
    }

    /// Run the interactive `engine-setup` tool.
    pub async fn run_setup(&self) -> Result<()> {
        info!("Running engine-setup");
        self.runner
            .run_checked(&HostCommand::new("engine-setup").interactive())
            .await?;
        Ok(())
    }
}
