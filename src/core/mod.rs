//! Core domain models for the pipeline
//!
//! This module defines the modes, steps, run parameters and run state
//! the execution layer operates on. Nothing here spawns processes.

pub mod config;
pub mod context;
pub mod mode;
pub mod state;
pub mod step;
pub mod task;

pub use config::*;
pub use context::*;
pub use mode::*;
pub use state::*;
pub use step::*;
