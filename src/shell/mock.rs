//! Mock shell for testing without touching git, npm, or the filesystem.

use std::cell::RefCell;
use std::path::Path;

use crate::shell::{ExecError, Shell};

/// Scripted shell that records every command it is asked to run.
///
/// Responses are matched by substring against the command line, first match
/// wins. Unmatched commands succeed with empty output, so tests only need
/// to script the commands they care about.
pub struct MockShell {
    responses: Vec<(String, std::result::Result<String, String>)>,
    log: RefCell<Vec<String>>,
}

impl MockShell {
    /// Create a mock shell with no scripted responses.
    pub fn new() -> Self {
        MockShell {
            responses: Vec::new(),
            log: RefCell::new(Vec::new()),
        }
    }

    /// Script stdout for any command containing `pattern`.
    pub fn respond(mut self, pattern: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.responses.push((pattern.into(), Ok(stdout.into())));
        self
    }

    /// Script a failure for any command containing `pattern`.
    pub fn fail(mut self, pattern: impl Into<String>, detail: impl Into<String>) -> Self {
        self.responses.push((pattern.into(), Err(detail.into())));
        self
    }

    /// Every command line executed so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Whether any executed command contains `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.log.borrow().iter().any(|cmd| cmd.contains(pattern))
    }
}

impl Default for MockShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell for MockShell {
    fn run(&self, command: &str, _dir: Option<&Path>) -> std::result::Result<String, ExecError> {
        self.log.borrow_mut().push(command.to_string());

        for (pattern, response) in &self.responses {
            if command.contains(pattern.as_str()) {
                return match response {
                    Ok(stdout) => Ok(stdout.clone()),
                    Err(detail) => Err(ExecError {
                        command: command.to_string(),
                        detail: detail.clone(),
                    }),
                };
            }
        }

        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_shell_default_succeeds() {
        let shell = MockShell::new();
        assert_eq!(shell.run("git fetch --tags", None).unwrap(), "");
    }

    #[test]
    fn test_mock_shell_scripted_response() {
        let shell = MockShell::new().respond("npm whoami", "angularcore");
        assert_eq!(shell.run("npm whoami", None).unwrap(), "angularcore");
    }

    #[test]
    fn test_mock_shell_scripted_failure() {
        let shell = MockShell::new().fail("git pull", "connection refused");
        let err = shell.run("git pull -q --rebase origin master", None).unwrap_err();
        assert_eq!(err.detail, "connection refused");
    }

    #[test]
    fn test_mock_shell_first_match_wins() {
        let shell = MockShell::new()
            .respond("git rev-parse", "master")
            .respond("git", "never reached");
        assert_eq!(
            shell.run("git rev-parse --abbrev-ref HEAD", None).unwrap(),
            "master"
        );
    }

    #[test]
    fn test_mock_shell_records_commands() {
        let shell = MockShell::new();
        shell.run("git fetch --tags", None).unwrap();
        shell.run("npm whoami", None).unwrap();
        assert_eq!(shell.commands(), ["git fetch --tags", "npm whoami"]);
        assert!(shell.ran("whoami"));
        assert!(!shell.ran("npm publish"));
    }
}
