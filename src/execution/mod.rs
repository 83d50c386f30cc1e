//! Pipeline execution engine

pub mod dependencies;
pub mod engine;
pub mod invoker;
pub mod snapshot;

pub use dependencies::{DependencyVerifier, SearchPath, ToolLocator};
pub use engine::{EventHandler, ExecutionEvent, OrchestratorState, PipelineOrchestrator};
pub use invoker::{StepInvoker, StepOutcome};
pub use snapshot::{EnvironmentRecord, EnvironmentSnapshotter, VERSION_NOT_AVAILABLE};
