//! Error taxonomy for pipeline runs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing or executing a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No configuration file was found. Recoverable: the run proceeds with defaults.
    #[error("Configuration file not found (searched: {})", display_paths(.searched))]
    ConfigurationMissing { searched: Vec<PathBuf> },

    /// A configuration file exists but could not be parsed
    #[error("Invalid configuration in {}: {message}", .path.display())]
    ConfigurationInvalid { path: PathBuf, message: String },

    /// One or more required tools are not resolvable on PATH
    #[error("Missing required tools: {}", .tools.join(", "))]
    MissingDependency { tools: Vec<String> },

    /// An external command ran and exited unsuccessfully
    #[error("Step failed: {step_name} - exit code {exit_code}: {message}")]
    StepExecutionFailed {
        step_name: String,
        exit_code: i32,
        message: String,
    },

    /// An external command could not be located or started
    #[error("Command not found for step: {step_name} - {command} ({reason})")]
    StepNotFound {
        step_name: String,
        command: String,
        reason: String,
    },

    #[error("Unknown mode: {0}")]
    InvalidMode(String),

    #[error("Unknown package manager: {0} (expected conda, mamba or micromamba)")]
    InvalidPackageManager(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Wrap an I/O error with a short description of what was being attempted
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PipelineError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error must abort the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PipelineError::ConfigurationMissing { .. })
    }

    /// The step this error is attributed to, if any
    pub fn step_name(&self) -> Option<&str> {
        match self {
            PipelineError::StepExecutionFailed { step_name, .. }
            | PipelineError::StepNotFound { step_name, .. } => Some(step_name),
            _ => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
