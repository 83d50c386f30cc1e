//! Pipeline modes and the fixed step plan each one runs

use crate::core::step::{
    StepDefinition, FUNCTIONAL_ANNOTATION, GENE_ANNOTATION, HOST_REMOVAL, MAG_TAXONOMIC_ASSIGNMENT,
    METAGENOME_ASSEMBLY, PIPELINE_STEPS, QUALITY_CHECK, TAXONOMIC_ASSIGNMENT,
};
use crate::error::PipelineError;
use std::fmt;
use std::str::FromStr;

/// Which step sequence to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineMode {
    All,
    Qc,
    RmHost,
    TaxAssignment,
    Assembly,
    TaxMags,
    GeneAnnotation,
    FuncAnnotation,
}

impl PipelineMode {
    pub const MODES: [PipelineMode; 8] = [
        PipelineMode::All,
        PipelineMode::Qc,
        PipelineMode::RmHost,
        PipelineMode::TaxAssignment,
        PipelineMode::Assembly,
        PipelineMode::TaxMags,
        PipelineMode::GeneAnnotation,
        PipelineMode::FuncAnnotation,
    ];

    /// Name accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineMode::All => "all",
            PipelineMode::Qc => "qc",
            PipelineMode::RmHost => "rmHost",
            PipelineMode::TaxAssignment => "taxAssignment",
            PipelineMode::Assembly => "assembly",
            PipelineMode::TaxMags => "taxMags",
            PipelineMode::GeneAnnotation => "geneAnnotation",
            PipelineMode::FuncAnnotation => "funcAnnotation",
        }
    }

    /// Ordered plan for this mode
    pub fn plan(&self) -> Vec<PlanEntry> {
        let single = |step: &'static StepDefinition| vec![PlanEntry::Step(step)];
        match self {
            PipelineMode::Qc => single(&QUALITY_CHECK),
            PipelineMode::RmHost => single(&HOST_REMOVAL),
            PipelineMode::TaxAssignment => single(&TAXONOMIC_ASSIGNMENT),
            PipelineMode::Assembly => single(&METAGENOME_ASSEMBLY),
            PipelineMode::TaxMags => single(&MAG_TAXONOMIC_ASSIGNMENT),
            PipelineMode::GeneAnnotation => single(&GENE_ANNOTATION),
            PipelineMode::FuncAnnotation => single(&FUNCTIONAL_ANNOTATION),
            PipelineMode::All => {
                let mut plan = vec![
                    PlanEntry::Prerequisite(Prerequisite::DependencyVerification),
                    PlanEntry::Prerequisite(Prerequisite::EnvironmentSnapshot),
                ];
                plan.extend(PIPELINE_STEPS.iter().map(|step| PlanEntry::Step(*step)));
                plan
            }
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::MODES
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| PipelineError::InvalidMode(s.to_string()))
    }
}

/// Action that gates a full pipeline run without being a tracked step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    DependencyVerification,
    EnvironmentSnapshot,
}

impl Prerequisite {
    pub fn name(&self) -> &'static str {
        match self {
            Prerequisite::DependencyVerification => "Dependency Verification",
            Prerequisite::EnvironmentSnapshot => "Environment Snapshot",
        }
    }
}

/// One entry of a mode's plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanEntry {
    Prerequisite(Prerequisite),
    Step(&'static StepDefinition),
}

impl PlanEntry {
    pub fn name(&self) -> &'static str {
        match self {
            PlanEntry::Prerequisite(p) => p.name(),
            PlanEntry::Step(step) => step.name,
        }
    }
}
