//! Run-time configuration from YAML

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file looked up relative to the working directory
pub const LOCAL_CONFIG_FILE: &str = "config/pipeline.yaml";

/// Directory holding the numbered step scripts, unless configured
pub const DEFAULT_SCRIPTS_DIR: &str = "src";

/// Directory receiving run logs and environment records, unless configured
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Tools a full pipeline run needs on PATH
pub const DEFAULT_REQUIRED_TOOLS: &[&str] = &[
    "fastqc",
    "trimmomatic",
    "bowtie2",
    "samtools",
    "kraken2",
    "spades.py",
    "checkm",
];

/// Version query for one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionProbe {
    /// Name recorded in the environment record
    pub tool: String,

    /// Command to run, program first
    pub command: Vec<String>,
}

impl VersionProbe {
    pub fn new(tool: &str, command: &[&str]) -> Self {
        Self {
            tool: tool.to_string(),
            command: command.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Default version registry for the environment snapshot
pub fn default_version_probes() -> Vec<VersionProbe> {
    vec![
        VersionProbe::new("fastqc", &["fastqc", "--version"]),
        VersionProbe::new("trimmomatic", &["trimmomatic", "-version"]),
        VersionProbe::new("bowtie2", &["bowtie2", "--version"]),
        VersionProbe::new("samtools", &["samtools", "--version"]),
        VersionProbe::new("kraken2", &["kraken2", "--version"]),
        VersionProbe::new("spades", &["spades.py", "--version"]),
    ]
}

/// Key/value settings for a run. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Thread count handed to every step; `0` means auto-detect
    pub threads: Option<u32>,

    /// Directory containing the step scripts
    pub scripts_dir: Option<PathBuf>,

    /// Directory for run logs and environment records
    pub log_dir: Option<PathBuf>,

    /// Tools checked before a full pipeline run
    pub required_tools: Option<Vec<String>>,

    /// Version queries run by the environment snapshot
    pub version_probes: Option<Vec<VersionProbe>>,
}

/// Result of looking for a configuration file
#[derive(Debug)]
pub struct LoadedConfiguration {
    pub configuration: Configuration,

    /// File the configuration was read from
    pub source: Option<PathBuf>,

    /// Set when no file was found; the run may still proceed
    pub warning: Option<PipelineError>,
}

impl LoadedConfiguration {
    /// Log where the configuration came from
    pub fn report(&self) {
        if let Some(source) = &self.source {
            info!("Configuration loaded from {}", source.display());
        }
        if let Some(warning) = &self.warning {
            warn!("{}", warning);
        }
    }
}

impl Configuration {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io(format!("read {}", path.display()), e))?;
        Self::from_yaml(&content).map_err(|e| PipelineError::ConfigurationInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration, falling back to an empty configuration when no file exists.
    ///
    /// With an explicit path only that file is considered. Otherwise
    /// `config/pipeline.yaml` in the working directory is tried, then
    /// `metapipeline/pipeline.yaml` in the user's config directory.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedConfiguration, PipelineError> {
        let candidates = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => default_candidates(),
        };
        Self::load_from(&candidates)
    }

    /// Load the first existing file among `candidates`
    pub fn load_from(candidates: &[PathBuf]) -> Result<LoadedConfiguration, PipelineError> {
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Ok(LoadedConfiguration {
                configuration: Self::from_file(path)?,
                source: Some(path.clone()),
                warning: None,
            }),
            None => Ok(LoadedConfiguration {
                configuration: Self::default(),
                source: None,
                warning: Some(PipelineError::ConfigurationMissing {
                    searched: candidates.to_vec(),
                }),
            }),
        }
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.scripts_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPTS_DIR))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
    }

    pub fn required_tools(&self) -> Vec<String> {
        self.required_tools.clone().unwrap_or_else(|| {
            DEFAULT_REQUIRED_TOOLS.iter().map(|s| s.to_string()).collect()
        })
    }

    pub fn version_probes(&self) -> Vec<VersionProbe> {
        self.version_probes
            .clone()
            .unwrap_or_else(default_version_probes)
    }
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("metapipeline").join("pipeline.yaml"));
    }
    candidates
}

/// Resolve the thread count passed to every step.
///
/// An explicit value wins verbatim. Otherwise the configured `threads` is
/// used, unless it is `0` or absent, in which case the host's available
/// parallelism is used.
pub fn resolve_threads(user_value: Option<&str>, configuration: &Configuration) -> String {
    if let Some(value) = user_value.filter(|v| !v.is_empty()) {
        return value.to_string();
    }
    match configuration.threads {
        Some(threads) if threads > 0 => threads.to_string(),
        _ => num_cpus::get().to_string(),
    }
}
