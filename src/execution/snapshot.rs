//! Environment snapshot - run provenance for reproducibility

use crate::{
    core::{Configuration, VersionProbe},
    error::PipelineError,
    process::{CommandLine, CommandOutput, CommandRunner, OutputMode},
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Recorded in place of a version that could not be determined
pub const VERSION_NOT_AVAILABLE: &str = "version not available";

/// Structured provenance record for one full pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    pub timestamp: String,
    pub orchestrator_version: String,
    pub working_directory: String,
    pub script_directory: String,
    pub tools: BTreeMap<String, String>,
}

/// Collects tool versions and writes the record next to the run log
#[derive(Debug, Clone)]
pub struct EnvironmentSnapshotter {
    probes: Vec<VersionProbe>,
    scripts_dir: PathBuf,
    log_dir: PathBuf,
}

impl EnvironmentSnapshotter {
    pub fn new(probes: Vec<VersionProbe>, scripts_dir: PathBuf, log_dir: PathBuf) -> Self {
        Self {
            probes,
            scripts_dir,
            log_dir,
        }
    }

    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self::new(
            configuration.version_probes(),
            configuration.scripts_dir(),
            configuration.log_dir(),
        )
    }

    /// Collect the record and write it to `environment_<timestamp>.json`
    pub async fn snapshot<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
    ) -> Result<(EnvironmentRecord, PathBuf), PipelineError> {
        let now = Local::now();
        let record = self.collect(runner, now).await;
        let path = self.write(&record, now)?;
        info!("Environment information saved to {}", path.display());
        Ok((record, path))
    }

    /// Build the record. Never fails: each probe degrades to a placeholder.
    pub async fn collect<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        now: DateTime<Local>,
    ) -> EnvironmentRecord {
        let mut tools = BTreeMap::new();
        for probe in &self.probes {
            let version = probe_version(runner, probe).await;
            debug!("{}: {}", probe.tool, version);
            tools.insert(probe.tool.clone(), version);
        }

        let working_directory = std::env::current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|_| ".".to_string());

        EnvironmentRecord {
            timestamp: now.to_rfc3339(),
            orchestrator_version: env!("CARGO_PKG_VERSION").to_string(),
            working_directory,
            script_directory: self.scripts_dir.display().to_string(),
            tools,
        }
    }

    fn write(&self, record: &EnvironmentRecord, now: DateTime<Local>) -> Result<PathBuf, PipelineError> {
        std::fs::create_dir_all(&self.log_dir).map_err(|e| {
            PipelineError::io(format!("create log directory {}", self.log_dir.display()), e)
        })?;

        let path = self
            .log_dir
            .join(format!("environment_{}.json", now.format("%Y%m%d_%H%M%S")));
        let mut payload = serde_json::to_string_pretty(record)
            .map_err(|e| PipelineError::io("serialize environment record", e.into()))?;
        payload.push('\n');

        std::fs::write(&path, payload)
            .map_err(|e| PipelineError::io(format!("write {}", path.display()), e))?;
        Ok(path)
    }
}

/// Run one version query; any failure of the query itself yields the placeholder
async fn probe_version<R: CommandRunner + ?Sized>(runner: &R, probe: &VersionProbe) -> String {
    let Some(command) = CommandLine::from_argv(probe.command.iter().cloned()) else {
        return VERSION_NOT_AVAILABLE.to_string();
    };

    match runner.run(&command, OutputMode::Capture).await {
        Ok(output) if output.is_success() => {
            version_text(&output).unwrap_or_else(|| VERSION_NOT_AVAILABLE.to_string())
        }
        Ok(output) => {
            debug!("{} version query exited with {:?}", probe.tool, output.exit_code);
            VERSION_NOT_AVAILABLE.to_string()
        }
        Err(e) => {
            debug!("{} version query failed: {}", probe.tool, e);
            VERSION_NOT_AVAILABLE.to_string()
        }
    }
}

/// Trimmed stdout, or stderr when stdout is empty. Non-UTF-8 output is malformed.
fn version_text(output: &CommandOutput) -> Option<String> {
    [&output.stdout, &output.stderr]
        .into_iter()
        .filter_map(|bytes| std::str::from_utf8(bytes).ok())
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
