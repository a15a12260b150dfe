//! Command runner backed by real processes.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::process::Command;
use tracing::debug;

use super::command::{CommandOutput, CommandRunner, HostCommand};
use crate::error::HyupError;

/// Spawns host commands with `tokio::process`.
///
/// Captured commands show a spinner on the terminal while they run; package
/// updates can take several minutes and print nothing until they finish.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub const fn new() -> Self {
        Self
    }

    fn build(command: &HostCommand) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.arguments());
        for (key, value) in command.env() {
            cmd.env(key, value);
        }
        cmd
    }

    fn spawn_error(command: &HostCommand, err: &std::io::Error) -> HyupError {
        HyupError::CommandSpawn {
            command: command.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &HostCommand) -> Result<CommandOutput, HyupError> {
        debug!("Running: {}", command);
        let mut cmd = Self::build(command);

        if command.is_interactive() {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(|e| Self::spawn_error(command, &e))?;

            debug!("`{}` finished with {}", command, status);
            return Ok(CommandOutput {
                code: status.code(),
                ..Default::default()
            });
        }

        let spinner = create_spinner(&command.to_string());
        let result = cmd.stdin(Stdio::null()).output().await;
        spinner.finish_and_clear();

        let output = result.map_err(|e| Self::spawn_error(command, &e))?;
        debug!("`{}` finished with {}", command, output.status);

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Create a spinner for a long-running command.
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb
}
