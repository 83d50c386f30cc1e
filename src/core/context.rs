//! Run parameters and the explicit pipeline context

use crate::core::{config::Configuration, state::RunTracker, step::ParamSlot};

/// Resolved parameter bag for a single invocation.
///
/// Built once from CLI input plus configuration defaults; read-only for the
/// duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    pub threads: String,
    pub forward_pattern: Option<String>,
    pub reverse_pattern: Option<String>,
    pub extension: Option<String>,
    pub host_db: Option<String>,
    pub taxonomy_db: Option<String>,
    pub phylo_db: Option<String>,
    pub functional_db: Option<String>,
    pub profiles: Option<String>,
    pub ko_list: Option<String>,
    pub prefix: Option<String>,
    pub tax_option: Option<String>,
}

impl RunContext {
    /// Create a context with only the thread count set
    pub fn new(threads: impl Into<String>) -> Self {
        Self {
            threads: threads.into(),
            ..Default::default()
        }
    }

    /// Value for a parameter slot; empty strings count as absent
    pub fn value(&self, slot: ParamSlot) -> Option<&str> {
        let value = match slot {
            ParamSlot::Threads => Some(&self.threads),
            ParamSlot::ForwardPattern => self.forward_pattern.as_ref(),
            ParamSlot::ReversePattern => self.reverse_pattern.as_ref(),
            ParamSlot::Extension => self.extension.as_ref(),
            ParamSlot::HostDb => self.host_db.as_ref(),
            ParamSlot::TaxonomyDb => self.taxonomy_db.as_ref(),
            ParamSlot::PhyloDb => self.phylo_db.as_ref(),
            ParamSlot::Prefix => self.prefix.as_ref(),
            ParamSlot::TaxOption => self.tax_option.as_ref(),
            ParamSlot::FunctionalDb => self.functional_db.as_ref(),
            ParamSlot::Profiles => self.profiles.as_ref(),
            ParamSlot::KoList => self.ko_list.as_ref(),
        };
        value.map(String::as_str).filter(|v| !v.is_empty())
    }
}

/// Everything one orchestrator run owns: configuration and progress ledger
#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    pub configuration: Configuration,
    pub tracker: RunTracker,
}

impl PipelineContext {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            tracker: RunTracker::new(),
        }
    }
}
