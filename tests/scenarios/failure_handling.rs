//! Test: Failure Handling - fail-fast semantics

use crate::helpers::*;
use metapipeline::core::{Configuration, ExecutionStatus, PipelineMode, RunContext};
use metapipeline::execution::ExecutionEvent;
use metapipeline::PipelineError;

/// A failing step stops the run; later steps are never launched
#[tokio::test]
async fn test_failure_stops_remaining_steps() {
    let dir = tempfile::tempdir().unwrap();
    let runner = MockRunner::new().failing("2_hostRemove.sh", 1);

    let result = run_mode(
        PipelineMode::All,
        runner,
        test_configuration(dir.path()),
        FakePath::all_tools(),
        &full_run_context(),
    )
    .await;

    assert_run_failed(&result);
    assert_eq!(result.record.completed, vec!["Quality Check"]);
    assert_eq!(result.record.failed, vec!["Host Removal"]);

    let scripts: Vec<&String> = result.programs.iter().filter(|p| p.ends_with(".sh")).collect();
    assert_eq!(scripts, vec!["1_qualityCheck.sh", "2_hostRemove.sh"]);

    match result.error() {
        PipelineError::StepExecutionFailed {
            step_name,
            exit_code,
            ..
        } => {
            assert_eq!(step_name, "Host Removal");
            assert_eq!(*exit_code, 1);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// A script that cannot be launched is reported as not found
#[tokio::test]
async fn test_unlaunchable_script() {
    let dir = tempfile::tempdir().unwrap();
    let runner = MockRunner::new().missing("4_metagenomeAssembly.sh");

    let result = run_mode(
        PipelineMode::Assembly,
        runner,
        test_configuration(dir.path()),
        FakePath::all_tools(),
        &full_run_context(),
    )
    .await;

    assert_run_failed(&result);
    assert!(matches!(
        result.error(),
        PipelineError::StepNotFound { step_name, .. } if step_name == "Metagenome Assembly"
    ));
    assert_eq!(result.record.failed, vec!["Metagenome Assembly"]);
    assert!(result.record.completed.is_empty());
    assert!(result.record.current_step.is_none());
}

/// The finish event carries the failed step list
#[tokio::test]
async fn test_finish_event_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let runner = MockRunner::new().failing("1_qualityCheck.sh", 3);

    let result = run_mode(
        PipelineMode::Qc,
        runner,
        test_configuration(dir.path()),
        FakePath::all_tools(),
        &full_run_context(),
    )
    .await;

    let finished = result
        .events
        .iter()
        .find_map(|event| match event {
            ExecutionEvent::PipelineFinished { completed, failed, .. } => Some((*completed, failed.clone())),
            _ => None,
        })
        .expect("finish event");
    assert_eq!(finished, (0, vec!["Quality Check".to_string()]));

    assert!(result
        .events
        .iter()
        .any(|event| matches!(event, ExecutionEvent::StepFailed { step_name, .. } if step_name == "Quality Check")));
}

/// A second run on the same orchestrator starts from an empty record
#[tokio::test]
async fn test_rerun_records_its_own_failure() {
    let runner = MockRunner::new();
    let (mut orchestrator, _) = orchestrator(runner.clone(), Configuration::default(), FakePath::all_tools());
    let context = RunContext::new("4");

    orchestrator.run(PipelineMode::GeneAnnotation, &context).await.unwrap();
    let first_run = orchestrator.record().run_id;
    assert_eq!(orchestrator.record().completed, vec!["Gene Annotation"]);

    runner.set_failing("6_geneAnnotation.sh", 1);
    let err = orchestrator
        .run(PipelineMode::GeneAnnotation, &context)
        .await
        .unwrap_err();

    let record = orchestrator.record();
    assert_eq!(err.step_name(), Some("Gene Annotation"));
    assert_eq!(record.status, ExecutionStatus::Failed);
    assert_eq!(record.failed, vec!["Gene Annotation"]);
    assert!(record.completed.is_empty());
    assert_eq!(record.timings.len(), 1);
    assert_ne!(record.run_id, first_run);
}
