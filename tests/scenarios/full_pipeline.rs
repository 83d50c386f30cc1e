//! Test: Full Pipeline - prerequisites and the seven-step chain

use crate::helpers::*;
use metapipeline::core::PipelineMode;
use metapipeline::execution::{EnvironmentRecord, VERSION_NOT_AVAILABLE};
use metapipeline::PipelineError;

const ALL_SCRIPTS: [&str; 7] = [
    "1_qualityCheck.sh",
    "2_hostRemove.sh",
    "3_taxonomicAssignmentHostRemoved.sh",
    "4_metagenomeAssembly.sh",
    "5_taxonomicAssignmentMAGs_Update.sh",
    "6_geneAnnotation.sh",
    "7_functionalAnnotation.sh",
];

fn environment_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("environment_") && n.ends_with(".json"))
        })
        .collect()
}

/// `all` verifies tools, snapshots the environment, then runs every step in order
#[tokio::test]
async fn test_full_pipeline_success() {
    let dir = tempfile::tempdir().unwrap();
    let runner = MockRunner::new()
        .printing("fastqc", "FastQC v0.12.1\n")
        .printing("kraken2", "Kraken version 2.1.3\n");

    let result = run_mode(
        PipelineMode::All,
        runner,
        test_configuration(dir.path()),
        FakePath::all_tools(),
        &full_run_context(),
    )
    .await;

    assert_run_completed(&result);

    let scripts: Vec<&str> = result
        .programs
        .iter()
        .map(String::as_str)
        .filter(|p| p.ends_with(".sh"))
        .collect();
    assert_eq!(scripts, ALL_SCRIPTS);

    // Prerequisites are not steps
    assert_eq!(
        result.record.completed,
        vec![
            "Quality Check",
            "Host Removal",
            "Taxonomic Assignment",
            "Metagenome Assembly",
            "MAG Taxonomic Assignment",
            "Gene Annotation",
            "Functional Annotation",
        ]
    );
    assert_eq!(result.record.timings.len(), 7);

    let files = environment_files(dir.path());
    assert_eq!(files.len(), 1);
    let record: EnvironmentRecord =
        serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(record.tools["fastqc"], "FastQC v0.12.1");
    assert_eq!(record.tools["kraken2"], "Kraken version 2.1.3");
    // Probes with no output degrade to the placeholder
    assert_eq!(record.tools["bowtie2"], VERSION_NOT_AVAILABLE);
}

/// Missing tools abort before any step or snapshot
#[tokio::test]
async fn test_missing_dependencies_abort_before_steps() {
    let dir = tempfile::tempdir().unwrap();

    let result = run_mode(
        PipelineMode::All,
        MockRunner::new(),
        test_configuration(dir.path()),
        FakePath::without(&["kraken2", "checkm"]),
        &full_run_context(),
    )
    .await;

    assert_run_failed(&result);
    assert!(result.programs.is_empty(), "nothing should launch: {:?}", result.programs);
    assert!(environment_files(dir.path()).is_empty());
    assert!(result.record.completed.is_empty());
    assert!(result.record.failed.is_empty());

    match result.error() {
        PipelineError::MissingDependency { tools } => assert_eq!(tools, &["kraken2", "checkm"]),
        other => panic!("unexpected error: {:?}", other),
    }
}

/// Required tools may be narrowed by configuration
#[tokio::test]
async fn test_configured_required_tools() {
    let dir = tempfile::tempdir().unwrap();
    let mut configuration = test_configuration(dir.path());
    configuration.required_tools = Some(vec!["fastqc".to_string()]);

    let result = run_mode(
        PipelineMode::All,
        MockRunner::new(),
        configuration,
        FakePath::without(&["kraken2"]),
        &full_run_context(),
    )
    .await;

    assert_run_completed(&result);
}

/// A failing version probe never fails the run
#[tokio::test]
async fn test_failed_version_probe_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let runner = MockRunner::new().missing("spades.py").failing("samtools", 2);

    let result = run_mode(
        PipelineMode::All,
        runner,
        test_configuration(dir.path()),
        FakePath::all_tools(),
        &full_run_context(),
    )
    .await;

    assert_run_completed(&result);
    let files = environment_files(dir.path());
    let record: EnvironmentRecord =
        serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(record.tools["spades"], VERSION_NOT_AVAILABLE);
    assert_eq!(record.tools["samtools"], VERSION_NOT_AVAILABLE);
}
