//! In-memory host used by unit tests.

use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use async_trait::async_trait;

use crate::channel::types::ChannelSet;
use crate::error::HyupError;
use crate::host::{CommandOutput, CommandRunner, HostCommand};
use crate::upgrade::approval::Approval;
use crate::upgrade::profile::{self, VersionProfile};

const NO_REPOSITORIES: &str = "This system has no repositories available through subscriptions.\n";

struct State {
    enabled: ChannelSet,
    installed: Vec<String>,
    update_check: String,
    setup_update_output: String,
    system_update_output: String,
    fail_on: Vec<String>,
    calls: Vec<String>,
    interactive_calls: Vec<String>,
}

/// Simulates `subscription-manager`, `engine-upgrade-check`, `rpm`, `yum`
/// and `engine-setup` against in-memory state, recording every invocation.
pub struct FakeHost {
    state: Mutex<State>,
}

impl FakeHost {
    pub fn with_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: Mutex::new(State {
                enabled: channels.into_iter().map(Into::into).collect(),
                installed: vec![
                    "ovirt-engine".to_string(),
                    "ovirt-engine-setup".to_string(),
                    "ovirt-engine-setup-base".to_string(),
                ],
                update_check: String::new(),
                setup_update_output: "Updated:\n  ovirt-engine-setup.noarch 0:4.0.7.4-0.1.el7\n"
                    .to_string(),
                system_update_output: "Complete!\n".to_string(),
                fail_on: Vec::new(),
                calls: Vec::new(),
                interactive_calls: Vec::new(),
            }),
        }
    }

    /// Host whose channels exactly match the given version.
    pub fn on_version(version: &str) -> Self {
        let required = profile::find(version)
            .expect("known version")
            .required_channels();
        Self::with_channels(required.iter())
    }

    pub fn with_packages<I, S>(self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().installed = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_update_check(self, output: &str) -> Self {
        self.set_update_check(output);
        self
    }

    pub fn with_setup_update_output(self, output: &str) -> Self {
        self.lock().setup_update_output = output.to_string();
        self
    }

    pub fn with_system_update_output(self, output: &str) -> Self {
        self.set_system_update_output(output);
        self
    }

    pub fn set_update_check(&self, output: &str) {
        self.lock().update_check = output.to_string();
    }

    pub fn set_system_update_output(&self, output: &str) {
        self.lock().system_update_output = output.to_string();
    }

    /// Make every command whose command line starts with `prefix` exit 1.
    pub fn fail_on(&self, prefix: &str) {
        self.lock().fail_on.push(prefix.to_string());
    }

    pub fn enabled(&self) -> ChannelSet {
        self.lock().enabled.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn interactive_calls(&self) -> Vec<String> {
        self.lock().interactive_calls.clone()
    }

    /// Channel enable/disable invocations.
    pub fn channel_mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains("--enable") || c.contains("--disable"))
            .collect()
    }

    /// Invocations that change the host.
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| {
                c.contains("--enable")
                    || c.contains("--disable")
                    || c.starts_with("yum")
                    || c.starts_with("engine-setup")
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake host state poisoned")
    }
}

impl State {
    fn respond(&mut self, command: &HostCommand) -> CommandOutput {
        let args = command.arguments();
        match command.program() {
            "subscription-manager" => self.subscription_manager(args),
            "engine-upgrade-check" => CommandOutput::success(self.update_check.clone()),
            "rpm" => {
                let mut listing = self.installed.join("\n");
                listing.push('\n');
                CommandOutput::success(listing)
            }
            "yum" if args.len() > 2 => CommandOutput::success(self.setup_update_output.clone()),
            "yum" => CommandOutput::success(self.system_update_output.clone()),
            "engine-setup" => CommandOutput::success(""),
            other => CommandOutput {
                code: Some(127),
                stdout: String::new(),
                stderr: format!("{other}: command not found"),
            },
        }
    }

    fn subscription_manager(&mut self, args: &[String]) -> CommandOutput {
        let mut stdout = String::new();
        for arg in args.iter().skip(1) {
            if arg == "--list-enabled" {
                stdout.push_str(&self.render_listing());
            } else if let Some(channel) = arg.strip_prefix("--enable=") {
                self.enabled.insert(channel);
                stdout.push_str(&format!("Repository '{channel}' is enabled for this system.\n"));
            } else if let Some(channel) = arg.strip_prefix("--disable=") {
                self.enabled = self
                    .enabled
                    .iter()
                    .filter(|c| *c != channel)
                    .collect();
                stdout.push_str(&format!("Repository '{channel}' is disabled for this system.\n"));
            }
        }
        CommandOutput::success(stdout)
    }

    fn render_listing(&self) -> String {
        if self.enabled.is_empty() {
            return NO_REPOSITORIES.to_string();
        }

        let mut out = String::from(
            "+----------------------------------------------------------+\n    \
             Available Repositories in /etc/yum.repos.d/redhat.repo\n\
             +----------------------------------------------------------+\n",
        );
        for channel in self.enabled.iter() {
            out.push_str(&format!(
                "Repo ID:   {channel}\nRepo Name: {channel}\nRepo URL:  https://cdn.example.com/{channel}\nEnabled:   1\n\n"
            ));
        }
        out
    }
}

#[async_trait]
impl CommandRunner for FakeHost {
    async fn run(&self, command: &HostCommand) -> Result<CommandOutput, HyupError> {
        let mut state = self.lock();
        let line = command.to_string();
        state.calls.push(line.clone());
        if command.is_interactive() {
            state.interactive_calls.push(line.clone());
        }

        if state.fail_on.iter().any(|prefix| line.starts_with(prefix)) {
            return Ok(CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "simulated failure".to_string(),
            });
        }

        Ok(state.respond(command))
    }
}

/// Declines every upgrade.
pub struct DenyAll;

impl Approval for DenyAll {
    fn approve(&self, _profile: &VersionProfile) -> Result<bool> {
        Ok(false)
    }
}
