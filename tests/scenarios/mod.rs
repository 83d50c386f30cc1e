//! Scenario-based tests for metapipeline

mod failure_handling;
mod full_pipeline;
mod mode_sequences;
