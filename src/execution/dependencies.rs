//! Dependency verifier - confirms required tools are on the search path

use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Resolves a tool name to an executable path
pub trait ToolLocator: Send + Sync {
    fn locate(&self, tool: &str) -> Option<PathBuf>;
}

/// Looks tools up in a list of directories, in order
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Directories from the `PATH` environment variable
    pub fn from_env() -> Self {
        let dirs = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();
        Self { dirs }
    }
}

impl ToolLocator for SearchPath {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        // A name with a separator is a path, not a PATH lookup
        if tool.contains(std::path::MAIN_SEPARATOR) {
            let path = PathBuf::from(tool);
            return is_executable(&path).then_some(path);
        }
        self.dirs
            .iter()
            .map(|dir| dir.join(tool))
            .find(|candidate| is_executable(candidate))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Checks that every tool a full run needs is resolvable
pub struct DependencyVerifier {
    locator: Box<dyn ToolLocator>,
}

impl DependencyVerifier {
    pub fn new(locator: impl ToolLocator + 'static) -> Self {
        Self {
            locator: Box::new(locator),
        }
    }

    /// Verifier over the current `PATH`
    pub fn search_path() -> Self {
        Self::new(SearchPath::from_env())
    }

    /// Probe every tool and fail once, listing all tools that were not found.
    ///
    /// Returns the resolved paths in the order the tools were given.
    pub fn check_dependencies(&self, required_tools: &[String]) -> Result<Vec<PathBuf>, PipelineError> {
        let mut resolved = Vec::with_capacity(required_tools.len());
        let mut missing = Vec::new();

        for tool in required_tools {
            match self.locator.locate(tool) {
                Some(path) => {
                    info!("✓ {} is available ({})", tool, path.display());
                    resolved.push(path);
                }
                None => {
                    warn!("✗ {} is not available", tool);
                    missing.push(tool.clone());
                }
            }
        }

        if !missing.is_empty() {
            return Err(PipelineError::MissingDependency { tools: missing });
        }

        info!("All required tools are available");
        Ok(resolved)
    }
}

impl Default for DependencyVerifier {
    fn default() -> Self {
        Self::search_path()
    }
}
