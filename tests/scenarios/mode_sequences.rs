//! Test: Mode Sequences - each single-stage mode runs exactly its script

use crate::helpers::*;
use metapipeline::core::{PipelineMode, RunContext};

/// Each single-stage mode launches one script and nothing else
#[tokio::test]
async fn test_single_stage_modes() {
    let cases = [
        (PipelineMode::Qc, "1_qualityCheck.sh", "Quality Check"),
        (PipelineMode::RmHost, "2_hostRemove.sh", "Host Removal"),
        (
            PipelineMode::TaxAssignment,
            "3_taxonomicAssignmentHostRemoved.sh",
            "Taxonomic Assignment",
        ),
        (PipelineMode::Assembly, "4_metagenomeAssembly.sh", "Metagenome Assembly"),
        (
            PipelineMode::TaxMags,
            "5_taxonomicAssignmentMAGs_Update.sh",
            "MAG Taxonomic Assignment",
        ),
        (PipelineMode::GeneAnnotation, "6_geneAnnotation.sh", "Gene Annotation"),
        (
            PipelineMode::FuncAnnotation,
            "7_functionalAnnotation.sh",
            "Functional Annotation",
        ),
    ];

    for (mode, script, step_name) in cases {
        let dir = tempfile::tempdir().unwrap();
        let result = run_mode(
            mode,
            MockRunner::new(),
            test_configuration(dir.path()),
            FakePath::all_tools(),
            &full_run_context(),
        )
        .await;

        assert_run_completed(&result);
        assert_launch_order(&result, &[script]);
        assert_eq!(result.record.completed, vec![step_name], "mode {}", mode);
        assert!(result.record.failed.is_empty());

        // Single-stage modes never snapshot the environment
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

/// Arguments are passed positionally, in the documented order
#[tokio::test]
async fn test_positional_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let context = full_run_context();

    let host = run_mode(
        PipelineMode::RmHost,
        MockRunner::new(),
        test_configuration(dir.path()),
        FakePath::all_tools(),
        &context,
    )
    .await;
    assert_eq!(
        host.argv_of("2_hostRemove.sh"),
        vec!["src/2_hostRemove.sh", "8", "_R1", "fastq.gz", "/db/GRCh38"]
    );

    let mags = run_mode(
        PipelineMode::TaxMags,
        MockRunner::new(),
        test_configuration(dir.path()),
        FakePath::all_tools(),
        &context,
    )
    .await;
    assert_eq!(
        mags.argv_of("5_taxonomicAssignmentMAGs_Update.sh"),
        vec![
            "src/5_taxonomicAssignmentMAGs_Update.sh",
            "8",
            "/db/phylophlan",
            "S01",
            "1"
        ]
    );

    let func = run_mode(
        PipelineMode::FuncAnnotation,
        MockRunner::new(),
        test_configuration(dir.path()),
        FakePath::all_tools(),
        &context,
    )
    .await;
    assert_eq!(
        func.argv_of("7_functionalAnnotation.sh"),
        vec![
            "src/7_functionalAnnotation.sh",
            "8",
            "S01",
            "/db/eggnog",
            "/db/kofam/profiles",
            "/db/kofam/ko_list"
        ]
    );
}

/// Missing parameters keep their position as empty arguments
#[tokio::test]
async fn test_missing_parameter_passed_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let context = RunContext {
        forward_pattern: Some("_R1".to_string()),
        extension: Some("fq".to_string()),
        ..RunContext::new("2")
    };

    let result = run_mode(
        PipelineMode::RmHost,
        MockRunner::new(),
        test_configuration(dir.path()),
        FakePath::all_tools(),
        &context,
    )
    .await;

    assert_run_completed(&result);
    assert_eq!(
        result.argv_of("2_hostRemove.sh"),
        vec!["src/2_hostRemove.sh", "2", "_R1", "fq", ""]
    );
}

/// The configured scripts directory prefixes every script
#[tokio::test]
async fn test_scripts_dir_from_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let mut configuration = test_configuration(dir.path());
    configuration.scripts_dir = Some("/opt/metapipeline/scripts".into());

    let result = run_mode(
        PipelineMode::GeneAnnotation,
        MockRunner::new(),
        configuration,
        FakePath::all_tools(),
        &RunContext::new("16"),
    )
    .await;

    assert_eq!(
        result.argv_of("6_geneAnnotation.sh"),
        vec!["/opt/metapipeline/scripts/6_geneAnnotation.sh", "16"]
    );
}
