//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Run has not started
    Pending,
    /// A step or prerequisite is executing
    Running,
    /// Every planned step succeeded
    Completed,
    /// The run halted on a failure
    Failed,
}

/// Wall-clock time spent in one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTiming {
    pub step_name: String,
    pub elapsed_secs: f64,
}

/// Progress ledger for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Unique run ID, used to correlate log lines
    pub run_id: Uuid,

    pub status: ExecutionStatus,

    pub started_at: Option<DateTime<Utc>>,

    /// Set once the run completes or fails
    pub finished_at: Option<DateTime<Utc>>,

    /// Steps that succeeded, in execution order
    pub completed: Vec<String>,

    /// Steps that failed, in execution order
    pub failed: Vec<String>,

    /// Step whose command is in flight
    pub current_step: Option<String>,

    pub timings: Vec<StepTiming>,
}

impl RunRecord {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: ExecutionStatus::Pending,
            started_at: None,
            finished_at: None,
            completed: Vec::new(),
            failed: Vec::new(),
            current_step: None,
            timings: Vec::new(),
        }
    }

    fn is_recorded(&self, step_name: &str) -> bool {
        self.completed.iter().chain(&self.failed).any(|s| s == step_name)
    }
}

/// Mutable run state, owned by the orchestrator for one run
#[derive(Debug, Clone)]
pub struct RunTracker {
    record: RunRecord,
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            record: RunRecord::new(),
        }
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    /// Start a new run with a fresh record and run id
    pub fn begin(&mut self) {
        self.record = RunRecord::new();
        self.record.status = ExecutionStatus::Running;
        self.record.started_at = Some(Utc::now());
    }

    pub fn mark_current(&mut self, step_name: &str) {
        self.record.current_step = Some(step_name.to_string());
    }

    pub fn clear_current(&mut self) {
        self.record.current_step = None;
    }

    pub fn mark_completed(&mut self, step_name: &str) {
        if self.record.is_recorded(step_name) {
            warn!("Step {} already has a recorded outcome", step_name);
            return;
        }
        self.record.completed.push(step_name.to_string());
    }

    pub fn mark_failed(&mut self, step_name: &str) {
        if self.record.is_recorded(step_name) {
            warn!("Step {} already has a recorded outcome", step_name);
            return;
        }
        self.record.failed.push(step_name.to_string());
    }

    pub fn record_elapsed(&mut self, step_name: &str, elapsed: Duration) {
        self.record.timings.push(StepTiming {
            step_name: step_name.to_string(),
            elapsed_secs: elapsed.as_secs_f64(),
        });
    }

    /// Set the end time
    pub fn finish(&mut self) {
        self.record.current_step = None;
        self.record.finished_at = Some(Utc::now());
    }

    /// Mark the run as completed successfully
    pub fn complete(&mut self) {
        self.record.status = ExecutionStatus::Completed;
        self.finish();
    }

    /// Mark the run as failed
    pub fn fail(&mut self) {
        self.record.status = ExecutionStatus::Failed;
        self.finish();
    }

    /// Time between begin and finish, if both happened
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        match (self.record.started_at, self.record.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// One-line description of the run for logs
    pub fn summary(&self) -> String {
        let status = match self.record.status {
            ExecutionStatus::Pending => "Pending",
            ExecutionStatus::Running => "Running",
            ExecutionStatus::Completed => "Completed",
            ExecutionStatus::Failed => "Failed",
        };
        format!(
            "{} - {} steps completed, {} steps failed",
            status,
            self.record.completed.len(),
            self.record.failed.len()
        )
    }
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}
