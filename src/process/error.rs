//! Errors at the process boundary

use thiserror::Error;

/// Why a command could not be run at all
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The program does not exist at the given path or on PATH
    #[error("{program}: command not found")]
    NotFound { program: String },

    /// The program exists but could not be started or waited on
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl RunnerError {
    /// Classify an error returned by spawning `program`
    pub fn from_io(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            RunnerError::NotFound {
                program: program.to_string(),
            }
        } else {
            RunnerError::Spawn {
                program: program.to_string(),
                source,
            }
        }
    }
}
