//! Scripted runner for unit tests

use crate::process::{CommandLine, CommandOutput, CommandRunner, OutputMode, RunnerError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What the scripted runner does for a given program
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Exit(CommandOutput),
    NotFound,
}

/// Runner that answers by program file name and records every call
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedRunner {
    responses: Arc<HashMap<String, Scripted>>,
    calls: Arc<Mutex<Vec<CommandLine>>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, program: &str, response: Scripted) -> Self {
        Arc::make_mut(&mut self.responses).insert(program.to_string(), response);
        self
    }

    pub(crate) fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().clone()
    }
}

fn file_name(program: &str) -> &str {
    program.rsplit('/').next().unwrap_or(program)
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &CommandLine, _mode: OutputMode) -> Result<CommandOutput, RunnerError> {
        self.calls.lock().unwrap().push(command.clone());
        match self.responses.get(file_name(&command.program)) {
            Some(Scripted::Exit(output)) => Ok(output.clone()),
            Some(Scripted::NotFound) => Err(RunnerError::NotFound {
                program: command.program.clone(),
            }),
            None => Ok(CommandOutput::success("")),
        }
    }
}
