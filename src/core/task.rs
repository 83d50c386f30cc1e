//! Standalone tasks: environment creation, checksum verification, project setup

use crate::error::PipelineError;
use crate::process::CommandLine;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const ENVIRONMENT_CREATION: &str = "Environment Creation";
pub const MD5_CHECK: &str = "MD5 Check";
pub const PROJECT_SETUP: &str = "Project Setup";

pub const MD5_SCRIPT: &str = "raw_readsCheck2.sh";
pub const SETUP_SCRIPT: &str = "setup3.sh";

pub const DEFAULT_PACKAGE_MANAGER: &str = "micromamba";
pub const DEFAULT_ENVIRONMENT_FILE: &str = "config/environment-full.yml";

/// Package manager used to build the tool environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Conda,
    Mamba,
    Micromamba,
}

impl PackageManager {
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Conda => "conda",
            PackageManager::Mamba => "mamba",
            PackageManager::Micromamba => "micromamba",
        }
    }

    /// Environment-creation invocation for `environment_file`
    pub fn create_command(&self, environment_file: &Path) -> CommandLine {
        let command = CommandLine::new(self.binary());
        let command = match self {
            PackageManager::Conda | PackageManager::Mamba => command.args(["env", "create"]),
            PackageManager::Micromamba => command.arg("create"),
        };
        command
            .arg("-f")
            .arg(environment_file.to_string_lossy())
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for PackageManager {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conda" => Ok(PackageManager::Conda),
            "mamba" => Ok(PackageManager::Mamba),
            "micromamba" => Ok(PackageManager::Micromamba),
            other => Err(PipelineError::InvalidPackageManager(other.to_string())),
        }
    }
}

/// Checksum verification of raw reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Md5Check {
    pub reads_dir: String,
    pub md5_file: String,
    pub extension: String,
    pub output: String,
}

impl Md5Check {
    pub fn command(&self, scripts_dir: &Path) -> CommandLine {
        CommandLine::new(scripts_dir.join(MD5_SCRIPT).to_string_lossy()).args([
            self.reads_dir.as_str(),
            self.md5_file.as_str(),
            self.extension.as_str(),
            self.output.as_str(),
        ])
    }
}

/// Creation of the project directory layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSetup {
    pub reads_dir: String,
    pub working_dir: String,
    pub pattern: String,
    pub extension: String,
    pub prefix: Option<String>,
}

impl ProjectSetup {
    /// The prefix is appended only when one was given
    pub fn command(&self, scripts_dir: &Path) -> CommandLine {
        let command = CommandLine::new(scripts_dir.join(SETUP_SCRIPT).to_string_lossy()).args([
            self.reads_dir.as_str(),
            self.working_dir.as_str(),
            self.pattern.as_str(),
            self.extension.as_str(),
        ]);
        match self.prefix.as_deref().filter(|p| !p.is_empty()) {
            Some(prefix) => command.arg(prefix),
            None => command,
        }
    }
}
