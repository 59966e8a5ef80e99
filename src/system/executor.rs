// src/system/executor.rs

use std::io::ErrorKind;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
}

/// The subprocess primitive the workers are built on: run a command line as
/// an external process and report success or failure.
///
/// Workers hold this behind a trait object so tests can substitute a
/// recording implementation for real child processes.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command_line: &str) -> Result<(), ExecutionError>;
}

/// Runs command lines as real child processes, inheriting stdout/stderr so
/// command output lands on the user's terminal.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<(), ExecutionError> {
        let trimmed = command_line.trim();
        if trimmed.is_empty() {
            return Ok(()); // An empty command is a success, not an error.
        }

        let parts = shlex::split(trimmed)
            .ok_or_else(|| ExecutionError::CommandParse(trimmed.to_string()))?;
        let Some((program, args)) = parts.split_first() else {
            return Ok(());
        };

        let mut command = StdCommand::new(program);
        command
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Fallback logic for Windows built-in commands like `echo`.
        // We try to spawn directly first. If it fails with `NotFound`, we try with `cmd /C`.
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
                log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
                StdCommand::new("cmd")
                    .arg("/C")
                    .arg(trimmed) // Pass the full, unparsed line to cmd
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .spawn()
                    .map_err(|e| ExecutionError::CommandFailed(trimmed.to_string(), e))?
            }
            Err(e) => {
                return Err(ExecutionError::CommandFailed(trimmed.to_string(), e));
            }
        };

        let status = child
            .wait()
            .map_err(|e| ExecutionError::CommandFailed(trimmed.to_string(), e))?;
        if !status.success() {
            return Err(ExecutionError::NonZeroExitStatus(trimmed.to_string()));
        }
        Ok(())
    }
}
