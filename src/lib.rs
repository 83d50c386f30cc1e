//! metapipeline - orchestrator for a multi-stage metagenomics workflow

pub mod cli;
pub mod core;
pub mod error;
pub mod execution;
pub mod logging;
pub mod process;

// Re-export commonly used types
pub use crate::core::{Configuration, PipelineContext, PipelineMode, RunContext, ExecutionStatus};
pub use crate::error::PipelineError;
pub use crate::execution::{ExecutionEvent, OrchestratorState, PipelineOrchestrator};
pub use crate::process::{CommandLine, CommandOutput, CommandRunner, OutputMode, RunnerError, SubprocessRunner};
