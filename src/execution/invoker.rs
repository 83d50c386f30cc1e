//! Step invoker - runs one external command and records its outcome

use crate::{
    core::RunTracker,
    error::PipelineError,
    process::{CommandLine, CommandRunner, OutputMode, RunnerError},
};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Outcome of a successful step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step_name: String,

    pub elapsed: Duration,

    /// Captured stdout, when output capture was requested
    pub output: Option<String>,
}

/// Executes single steps through a command runner
pub struct StepInvoker<R> {
    runner: R,
}

impl<R: CommandRunner> StepInvoker<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `command` as step `step_name`.
    ///
    /// The tracker's current step is set for as long as the child runs. The
    /// step lands in the completed list on exit code zero and in the failed
    /// list otherwise. Elapsed time is logged and recorded on every path.
    /// There is no retry.
    pub async fn invoke(
        &self,
        tracker: &mut RunTracker,
        command: &CommandLine,
        step_name: &str,
        capture_output: bool,
    ) -> Result<StepOutcome, PipelineError> {
        tracker.mark_current(step_name);
        info!("Starting step: {}", step_name);
        info!("Command: {}", command);

        let mode = if capture_output {
            OutputMode::Capture
        } else {
            OutputMode::Inherit
        };

        let started = Instant::now();
        let result = self.runner.run(command, mode).await;
        let elapsed = started.elapsed();

        tracker.clear_current();
        tracker.record_elapsed(step_name, elapsed);
        info!("Step {} took {:.2} seconds", step_name, elapsed.as_secs_f64());

        match result {
            Ok(output) if output.is_success() => {
                info!("Step completed: {}", step_name);
                tracker.mark_completed(step_name);
                Ok(StepOutcome {
                    step_name: step_name.to_string(),
                    elapsed,
                    output: capture_output.then(|| output.stdout_text()),
                })
            }
            Ok(output) => {
                let err = PipelineError::StepExecutionFailed {
                    step_name: step_name.to_string(),
                    exit_code: output.exit_code.unwrap_or(-1),
                    message: output.failure_message(),
                };
                error!("{}", err);
                tracker.mark_failed(step_name);
                Err(err)
            }
            Err(runner_error) => {
                let reason = match &runner_error {
                    RunnerError::NotFound { .. } => runner_error.to_string(),
                    RunnerError::Spawn { source, .. } => source.to_string(),
                };
                let err = PipelineError::StepNotFound {
                    step_name: step_name.to_string(),
                    command: command.to_string(),
                    reason,
                };
                error!("{}", err);
                tracker.mark_failed(step_name);
                Err(err)
            }
        }
    }
}
