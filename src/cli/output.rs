//! CLI output formatting

use crate::{core::ExecutionStatus, execution::ExecutionEvent};
use console::Emoji;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Pending => style("PENDING").dim().to_string(),
        ExecutionStatus::Running => style("RUNNING").yellow().to_string(),
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted { run_id, label, total } => format!(
            "{} Starting {} ({} entries, {})",
            ROCKET,
            style(label).bold(),
            total,
            style(&run_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::PrerequisiteStarted { name } => {
            format!("{} {}", SPINNER, style(name).cyan())
        }
        ExecutionEvent::PrerequisitePassed { name } => {
            format!("{} {}", CHECK, style(name).green())
        }
        ExecutionEvent::PrerequisiteFailed { name, error } => {
            format!("{} {}: {}", CROSS, style(name).red(), style(error).dim())
        }
        ExecutionEvent::StepStarted { step_name, command } => format!(
            "{} {}\n   {}",
            SPINNER,
            style(step_name).cyan(),
            style(command).dim()
        ),
        ExecutionEvent::StepCompleted { step_name, elapsed } => format!(
            "{} {} ({})",
            CHECK,
            style(step_name).green(),
            style(format_duration(*elapsed)).dim()
        ),
        ExecutionEvent::StepFailed { step_name, error } => {
            format!("{} {}: {}", CROSS, style(step_name).red(), style(error).dim())
        }
        ExecutionEvent::PipelineFinished {
            run_id,
            status,
            completed,
            failed,
        } => {
            let mut line = format!(
                "{} Run {} {} - {} completed",
                INFO,
                style(&run_id.to_string()[..8]).dim(),
                format_status(*status),
                completed
            );
            if !failed.is_empty() {
                line.push_str(&format!(", failed: {}", style(failed.join(", ")).red()));
            }
            line
        }
    }
}

/// Human-readable duration
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
