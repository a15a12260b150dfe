//! Custom error types for engine-hyper-upgrade.

use thiserror::Error;

/// Errors that can occur while upgrading an engine host.
#[derive(Error, Debug)]
pub enum HyupError {
    #[error("`{command}` exited with {}{}", format_code(.code), format_output(.stdout, .stderr))]
    ExternalCommand {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Failed to execute `{command}`: {reason}")]
    CommandSpawn { command: String, reason: String },

    #[error("Unsupported version: {0} (known versions: 4.0, 4.1)")]
    UnsupportedVersion(String),

    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    #[error("Operation cancelled by user")]
    UserCancelled,
}

impl HyupError {
    /// Returns true if the error came from an external operation on the host.
    pub const fn is_external(&self) -> bool {
        matches!(self, Self::ExternalCommand { .. } | Self::CommandSpawn { .. })
    }
}

fn format_code(code: &Option<i32>) -> String {
    code.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |c| format!("exit code {c}"),
    )
}

/// Single-block rendering of captured output, omitting empty streams.
fn format_output(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    if !stdout.trim().is_empty() {
        out.push_str(&format!("\n--- stdout ---\n{}", stdout.trim_end()));
    }
    if !stderr.trim().is_empty() {
        out.push_str(&format!("\n--- stderr ---\n{}", stderr.trim_end()));
    }
    out
}
