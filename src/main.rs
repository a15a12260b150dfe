//! engine-hyper-upgrade - staged upgrade CLI for oVirt/RHV engine hosts.
//!
//! Upgrades an engine host one major version at a time:
//! - Channel subscription compliance for the current version
//! - Maintenance update to the latest z-stream, halting on kernel updates
//! - Channel migration to the next version followed by engine-setup

mod channel;
mod config;
mod error;
mod host;
mod output;
#[cfg(test)]
mod testing;
mod upgrade;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::{debug, error};

use channel::manager::ChannelManager;
use config::{Action, Args, Config};
use error::HyupError;
use host::{CommandRunner, SystemRunner};
use upgrade::approval::{Approval, AutoApprove, InteractiveApproval};
use upgrade::orchestrator::Orchestrator;
use upgrade::profile;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = Config::from_args(args);

    // Initialize logging
    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!("Starting engine-hyper-upgrade");

    if let Err(e) = run(&config).await {
        error!("{}", e);
        if e.downcast_ref::<HyupError>().is_some_and(HyupError::is_external) {
            eprintln!(
                "{}",
                "Channel and package changes made before the failure were not rolled back."
                    .yellow()
            );
        }
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(config: &Config) -> Result<()> {
    let action = config.action()?;
    let runner = SystemRunner::new();

    match action {
        Action::ListEnabledRepos => list_enabled_repos(&runner).await,
        Action::CheckUpgrade(versions) => check_upgrade(&runner, config, &versions).await,
    }
}

/// Initialize tracing subscriber.
fn init_tracing(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to initialize log filter: {}", e))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

async fn list_enabled_repos(runner: &dyn CommandRunner) -> Result<()> {
    let listing = ChannelManager::new(runner).query().await?;
    output::print_channel_listing(&listing);
    Ok(())
}

async fn check_upgrade(
    runner: &dyn CommandRunner,
    config: &Config,
    versions: &[String],
) -> Result<()> {
    let profiles = profile::select(versions)?;

    let approval: Box<dyn Approval> = if config.yes || config.dry_run {
        Box::new(AutoApprove)
    } else {
        Box::new(InteractiveApproval)
    };

    let orchestrator = Orchestrator::new(runner, approval.as_ref(), config.upgrade_config());
    let report = orchestrator.run(&profiles).await?;

    output::print_summary(&report);
    Ok(())
}
