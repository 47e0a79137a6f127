//! Command-execution capability.
//!
//! Every external operation (git, npm, changelog generator, build pipeline)
//! goes through the [`Shell`] trait so the workflow can be driven against a
//! mock in tests. Execution is synchronous and blocking; a failing command
//! is returned as an [`ExecError`] value, never a panic.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

pub mod mock;

/// A failed external command, carrying whatever diagnostics were captured.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{command}` failed: {detail}")]
pub struct ExecError {
    pub command: String,
    pub detail: String,
}

/// Capability for running external commands.
pub trait Shell {
    /// Runs `command` through the system shell, blocking until it exits.
    ///
    /// # Arguments
    /// * `command` - The shell command line to run
    /// * `dir` - Working directory, or the process cwd when `None`
    ///
    /// # Returns
    /// * `Ok(String)` - Trimmed stdout of the successful command
    /// * `Err(ExecError)` - Spawn failure or non-zero exit, with stderr
    fn run(&self, command: &str, dir: Option<&Path>) -> std::result::Result<String, ExecError>;
}

/// Shell implementation backed by `sh -c`.
pub struct SystemShell;

impl Shell for SystemShell {
    fn run(&self, command: &str, dir: Option<&Path>) -> std::result::Result<String, ExecError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        match cmd.output() {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let detail = if stderr.is_empty() {
                    format!("exit code {}", output.status.code().unwrap_or(-1))
                } else {
                    stderr
                };
                Err(ExecError {
                    command: command.to_string(),
                    detail,
                })
            }
            Err(e) => Err(ExecError {
                command: command.to_string(),
                detail: e.to_string(),
            }),
        }
    }
}
