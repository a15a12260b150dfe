//! Command description, captured output and the runner seam.

use std::fmt;

use async_trait::async_trait;

use crate::error::HyupError;

/// Locale forced on every external command so its output stays parseable.
const FORCED_LOCALE: (&str, &str) = ("LC_ALL", "C");

/// An external program invocation: program name plus a discrete argument vector.
///
/// Arguments are never joined into a shell string, so channel ids and package
/// names cannot inject extra arguments or shell syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    interactive: bool,
}

impl HostCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: vec![(FORCED_LOCALE.0.to_string(), FORCED_LOCALE.1.to_string())],
            interactive: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Attach the command to the terminal instead of capturing its output.
    pub const fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub const fn is_interactive(&self) -> bool {
        self.interactive
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a finished command.
///
/// `code` is `None` when the process was terminated by a signal.
/// Interactive commands leave `stdout` and `stderr` empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[cfg(test)]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Convert a non-zero exit into [`HyupError::ExternalCommand`].
    pub fn check(self, command: &HostCommand) -> Result<Self, HyupError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HyupError::ExternalCommand {
                command: command.to_string(),
                code: self.code,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

/// Executes host commands.
///
/// `run` only fails when the program cannot be started; a non-zero exit is
/// reported through [`CommandOutput::code`]. Use `run_checked` to treat a
/// non-zero exit as an error.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &HostCommand) -> Result<CommandOutput, HyupError>;

    async fn run_checked(&self, command: &HostCommand) -> Result<CommandOutput, HyupError> {
        self.run(command).await?.check(command)
    }
}
