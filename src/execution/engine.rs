//! Pipeline orchestrator - runs a mode's plan in order, stopping at the first failure

use crate::{
    core::{
        task::{self, Md5Check, PackageManager, ProjectSetup},
        ExecutionStatus, PipelineContext, PipelineMode, PlanEntry, Prerequisite, RunContext,
        RunRecord, StepDefinition,
    },
    error::PipelineError,
    execution::{DependencyVerifier, EnvironmentSnapshotter, StepInvoker, StepOutcome, ToolLocator},
    process::{CommandLine, CommandRunner},
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Events that can occur during a run
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        run_id: Uuid,
        label: String,
        total: usize,
    },
    PrerequisiteStarted {
        name: &'static str,
    },
    PrerequisitePassed {
        name: &'static str,
    },
    PrerequisiteFailed {
        name: &'static str,
        error: String,
    },
    StepStarted {
        step_name: String,
        command: String,
    },
    StepCompleted {
        step_name: String,
        elapsed: Duration,
    },
    StepFailed {
        step_name: String,
        error: String,
    },
    PipelineFinished {
        run_id: Uuid,
        status: ExecutionStatus,
        completed: usize,
        failed: Vec<String>,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Orchestrator state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Running { index: usize, entry: &'static str },
    Completed,
    Failed,
}

/// Sequences steps for a mode and owns the run's context
pub struct PipelineOrchestrator<R> {
    invoker: StepInvoker<R>,
    verifier: DependencyVerifier,
    context: PipelineContext,
    state: OrchestratorState,
    event_handlers: Vec<EventHandler>,
}

impl<R: CommandRunner> PipelineOrchestrator<R> {
    pub fn new(runner: R, context: PipelineContext) -> Self {
        Self {
            invoker: StepInvoker::new(runner),
            verifier: DependencyVerifier::default(),
            context,
            state: OrchestratorState::Idle,
            event_handlers: Vec::new(),
        }
    }

    /// Replace the PATH lookup used for dependency verification
    pub fn with_locator(mut self, locator: impl ToolLocator + 'static) -> Self {
        self.verifier = DependencyVerifier::new(locator);
        self
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    pub fn record(&self) -> &RunRecord {
        self.context.tracker.record()
    }

    /// Execute the plan for `mode`.
    ///
    /// Entries run strictly in order; the first failure moves the orchestrator
    /// to `Failed` and no later entry is attempted.
    pub async fn run(&mut self, mode: PipelineMode, run_context: &RunContext) -> Result<(), PipelineError> {
        let plan = mode.plan();
        self.begin(&format!("{} pipeline", mode), plan.len());

        let result = self.run_plan(&plan, run_context).await;
        self.finish(&result);
        result
    }

    /// Run a single standalone task as a one-step run
    pub async fn run_task(&mut self, step_name: &str, command: CommandLine) -> Result<StepOutcome, PipelineError> {
        self.begin(step_name, 1);
        self.state = OrchestratorState::Running {
            index: 0,
            entry: "task",
        };

        let result = self.invoke_step(step_name, &command).await;
        self.finish(&result);
        result
    }

    pub async fn create_environment(
        &mut self,
        package_manager: PackageManager,
        environment_file: &Path,
    ) -> Result<StepOutcome, PipelineError> {
        let command = package_manager.create_command(environment_file);
        self.run_task(task::ENVIRONMENT_CREATION, command).await
    }

    /// Parse `package_manager` and create the environment.
    ///
    /// An unknown manager is rejected before any command is launched.
    pub async fn create_environment_from(
        &mut self,
        package_manager: &str,
        environment_file: &Path,
    ) -> Result<StepOutcome, PipelineError> {
        let package_manager: PackageManager = package_manager.parse()?;
        self.create_environment(package_manager, environment_file).await
    }

    pub async fn check_md5(&mut self, check: &Md5Check) -> Result<StepOutcome, PipelineError> {
        let command = check.command(&self.context.configuration.scripts_dir());
        self.run_task(task::MD5_CHECK, command).await
    }

    pub async fn setup_project(&mut self, setup: &ProjectSetup) -> Result<StepOutcome, PipelineError> {
        let command = setup.command(&self.context.configuration.scripts_dir());
        self.run_task(task::PROJECT_SETUP, command).await
    }

    fn begin(&mut self, label: &str, total: usize) {
        self.context.tracker.begin();
        let run_id = self.record().run_id;
        info!("Starting {} ({} entries, run {})", label, total, run_id);
        self.emit_event(ExecutionEvent::PipelineStarted {
            run_id,
            label: label.to_string(),
            total,
        });
    }

    fn finish<T>(&mut self, result: &Result<T, PipelineError>) {
        let tracker = &mut self.context.tracker;
        match result {
            Ok(_) => {
                tracker.complete();
                self.state = OrchestratorState::Completed;
                let elapsed = tracker
                    .elapsed()
                    .and_then(|d| d.to_std().ok())
                    .unwrap_or_default();
                info!("Pipeline completed successfully in {:.2}s", elapsed.as_secs_f64());
                info!("Steps completed: {}", tracker.record().completed.len());
            }
            Err(e) => {
                tracker.fail();
                self.state = OrchestratorState::Failed;
                error!("Pipeline failed: {}", e);
                if !tracker.record().failed.is_empty() {
                    error!("Failed steps: {}", tracker.record().failed.join(", "));
                }
            }
        }

        let record = self.context.tracker.record();
        if let Ok(json) = serde_json::to_string(record) {
            debug!("Run record: {}", json);
        }
        self.emit_event(ExecutionEvent::PipelineFinished {
            run_id: record.run_id,
            status: record.status,
            completed: record.completed.len(),
            failed: record.failed.clone(),
        });
    }

    async fn run_plan(&mut self, plan: &[PlanEntry], run_context: &RunContext) -> Result<(), PipelineError> {
        for (index, entry) in plan.iter().enumerate() {
            self.state = OrchestratorState::Running {
                index,
                entry: entry.name(),
            };
            match entry {
                PlanEntry::Prerequisite(prerequisite) => self.run_prerequisite(*prerequisite).await?,
                PlanEntry::Step(step) => {
                    self.run_step(step, run_context).await?;
                }
            }
        }
        Ok(())
    }

    async fn run_prerequisite(&mut self, prerequisite: Prerequisite) -> Result<(), PipelineError> {
        let name = prerequisite.name();
        info!("Running prerequisite: {}", name);
        self.emit_event(ExecutionEvent::PrerequisiteStarted { name });

        let configuration = &self.context.configuration;
        let result = match prerequisite {
            Prerequisite::DependencyVerification => self
                .verifier
                .check_dependencies(&configuration.required_tools())
                .map(|_| ()),
            Prerequisite::EnvironmentSnapshot => EnvironmentSnapshotter::from_configuration(configuration)
                .snapshot(self.invoker.runner())
                .await
                .map(|_| ()),
        };

        match &result {
            Ok(()) => self.emit_event(ExecutionEvent::PrerequisitePassed { name }),
            Err(e) => self.emit_event(ExecutionEvent::PrerequisiteFailed {
                name,
                error: e.to_string(),
            }),
        }
        result
    }

    async fn run_step(&mut self, step: &StepDefinition, run_context: &RunContext) -> Result<StepOutcome, PipelineError> {
        let prepared = step.prepare(&self.context.configuration.scripts_dir(), run_context);
        for slot in &prepared.missing {
            warn!("{}: no value for {}, passing an empty parameter", step.name, slot);
        }
        self.invoke_step(step.name, &prepared.command).await
    }

    async fn invoke_step(&mut self, step_name: &str, command: &CommandLine) -> Result<StepOutcome, PipelineError> {
        self.emit_event(ExecutionEvent::StepStarted {
            step_name: step_name.to_string(),
            command: command.to_string(),
        });

        let result = self
            .invoker
            .invoke(&mut self.context.tracker, command, step_name, false)
            .await;

        match &result {
            Ok(outcome) => self.emit_event(ExecutionEvent::StepCompleted {
                step_name: step_name.to_string(),
                elapsed: outcome.elapsed,
            }),
            Err(e) => self.emit_event(ExecutionEvent::StepFailed {
                step_name: step_name.to_string(),
                error: e.to_string(),
            }),
        }
        result
    }
}
