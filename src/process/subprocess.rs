//! Subprocess runner built on tokio's process API

use crate::process::{CommandLine, CommandOutput, CommandRunner, OutputMode, RunnerError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs commands as foreground child processes
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(&self, command: &CommandLine, mode: OutputMode) -> Result<CommandOutput, RunnerError> {
        debug!("Spawning {} ({:?})", command.program, mode);

        let mut child = Command::new(&command.program);
        child.args(&command.args);

        let output = match mode {
            OutputMode::Inherit => {
                let status = child
                    .status()
                    .await
                    .map_err(|e| RunnerError::from_io(&command.program, e))?;
                CommandOutput {
                    exit_code: status.code(),
                    ..Default::default()
                }
            }
            OutputMode::Capture => {
                let output = child
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output()
                    .await
                    .map_err(|e| RunnerError::from_io(&command.program, e))?;
                CommandOutput {
                    exit_code: output.status.code(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                }
            }
        };

        if !output.is_success() {
            warn!(
                "{} exited with code {:?}",
                command.program, output.exit_code
            );
        }

        Ok(output)
    }
}
