//! Process boundary - the only place that talks to the operating system's process API

pub mod command;
pub mod error;
pub mod subprocess;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
pub use command::{CommandLine, CommandOutput, OutputMode};
pub use error::RunnerError;
pub use subprocess::SubprocessRunner;

/// Trait for running external commands - allows for different implementations
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion and report how it exited
    async fn run(&self, command: &CommandLine, mode: OutputMode) -> Result<CommandOutput, RunnerError>;
}
