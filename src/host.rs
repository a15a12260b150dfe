//! External command execution on the local host.

pub mod command;
pub mod system;

pub use command::{CommandOutput, CommandRunner, HostCommand};
pub use system::SystemRunner;
