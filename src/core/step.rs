//! Step domain model

use crate::core::context::RunContext;
use crate::process::CommandLine;
use std::fmt;
use std::path::Path;

/// A positional parameter a step script expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSlot {
    Threads,
    ForwardPattern,
    ReversePattern,
    Extension,
    HostDb,
    TaxonomyDb,
    PhyloDb,
    Prefix,
    TaxOption,
    FunctionalDb,
    Profiles,
    KoList,
}

impl ParamSlot {
    /// CLI flag that supplies this parameter
    pub fn flag(&self) -> &'static str {
        match self {
            ParamSlot::Threads => "-t",
            ParamSlot::ForwardPattern => "-p1",
            ParamSlot::ReversePattern => "-p2",
            ParamSlot::Extension => "-e",
            ParamSlot::HostDb => "-bDB",
            ParamSlot::TaxonomyDb => "-kDB",
            ParamSlot::PhyloDb => "-pDB",
            ParamSlot::Prefix => "-n",
            ParamSlot::TaxOption => "-opt",
            ParamSlot::FunctionalDb => "-eDB",
            ParamSlot::Profiles => "-profile",
            ParamSlot::KoList => "-kL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParamSlot::Threads => "threads",
            ParamSlot::ForwardPattern => "forward read pattern",
            ParamSlot::ReversePattern => "reverse read pattern",
            ParamSlot::Extension => "file extension",
            ParamSlot::HostDb => "Bowtie2 database",
            ParamSlot::TaxonomyDb => "Kraken2 database",
            ParamSlot::PhyloDb => "PhyloPhlAn database",
            ParamSlot::Prefix => "sample prefix",
            ParamSlot::TaxOption => "taxonomic assignment option",
            ParamSlot::FunctionalDb => "eggNOG database",
            ParamSlot::Profiles => "KofamDB profiles",
            ParamSlot::KoList => "KofamDB ko list",
        }
    }
}

impl fmt::Display for ParamSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.flag())
    }
}

/// A single computational step, implemented by an external script
#[derive(Debug, PartialEq, Eq)]
pub struct StepDefinition {
    /// Human-readable step name
    pub name: &'static str,

    /// Script file name, resolved against the scripts directory
    pub script: &'static str,

    /// Ordered positional parameters the script takes
    pub params: &'static [ParamSlot],
}

pub static QUALITY_CHECK: StepDefinition = StepDefinition {
    name: "Quality Check",
    script: "1_qualityCheck.sh",
    params: &[
        ParamSlot::Threads,
        ParamSlot::ForwardPattern,
        ParamSlot::ReversePattern,
        ParamSlot::Extension,
    ],
};

pub static HOST_REMOVAL: StepDefinition = StepDefinition {
    name: "Host Removal",
    script: "2_hostRemove.sh",
    params: &[
        ParamSlot::Threads,
        ParamSlot::ForwardPattern,
        ParamSlot::Extension,
        ParamSlot::HostDb,
    ],
};

pub static TAXONOMIC_ASSIGNMENT: StepDefinition = StepDefinition {
    name: "Taxonomic Assignment",
    script: "3_taxonomicAssignmentHostRemoved.sh",
    params: &[
        ParamSlot::Threads,
        ParamSlot::ForwardPattern,
        ParamSlot::Extension,
        ParamSlot::TaxonomyDb,
    ],
};

pub static METAGENOME_ASSEMBLY: StepDefinition = StepDefinition {
    name: "Metagenome Assembly",
    script: "4_metagenomeAssembly.sh",
    params: &[
        ParamSlot::Threads,
        ParamSlot::ForwardPattern,
        ParamSlot::Extension,
    ],
};

pub static MAG_TAXONOMIC_ASSIGNMENT: StepDefinition = StepDefinition {
    name: "MAG Taxonomic Assignment",
    script: "5_taxonomicAssignmentMAGs_Update.sh",
    params: &[
        ParamSlot::Threads,
        ParamSlot::PhyloDb,
        ParamSlot::Prefix,
        ParamSlot::TaxOption,
    ],
};

pub static GENE_ANNOTATION: StepDefinition = StepDefinition {
    name: "Gene Annotation",
    script: "6_geneAnnotation.sh",
    params: &[ParamSlot::Threads],
};

pub static FUNCTIONAL_ANNOTATION: StepDefinition = StepDefinition {
    name: "Functional Annotation",
    script: "7_functionalAnnotation.sh",
    params: &[
        ParamSlot::Threads,
        ParamSlot::Prefix,
        ParamSlot::FunctionalDb,
        ParamSlot::Profiles,
        ParamSlot::KoList,
    ],
};

/// Every computational step, in pipeline order
pub static PIPELINE_STEPS: [&StepDefinition; 7] = [
    &QUALITY_CHECK,
    &HOST_REMOVAL,
    &TAXONOMIC_ASSIGNMENT,
    &METAGENOME_ASSEMBLY,
    &MAG_TAXONOMIC_ASSIGNMENT,
    &GENE_ANNOTATION,
    &FUNCTIONAL_ANNOTATION,
];

/// A step's resolved command plus the parameters that had no value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    pub command: CommandLine,
    pub missing: Vec<ParamSlot>,
}

impl StepDefinition {
    /// Build the script invocation for this step.
    ///
    /// Parameters without a value are passed as empty strings so every
    /// later parameter keeps its position.
    pub fn prepare(&self, scripts_dir: &Path, context: &RunContext) -> PreparedCommand {
        let script = scripts_dir.join(self.script);
        let mut command = CommandLine::new(script.to_string_lossy());
        let mut missing = Vec::new();

        for slot in self.params {
            match context.value(*slot) {
                Some(value) => command = command.arg(value),
                None => {
                    missing.push(*slot);
                    command = command.arg("");
                }
            }
        }

        PreparedCommand { command, missing }
    }
}
