//! Process execution.
//!
//! Every external program hopper talks to (tmux, the selector, the editor)
//! is invoked through [`CommandExecutor`]. The real implementation wraps
//! `std::process::Command`; unit tests swap in a recording fake.

use crate::{Error, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: &str) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short description of a failure, suitable for an error message.
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        match (self.code, stderr.is_empty()) {
            (Some(code), true) => format!("exit status {}", code),
            (Some(code), false) => format!("exit status {}: {}", code, stderr),
            (None, true) => "terminated by signal".to_string(),
            (None, false) => format!("terminated by signal: {}", stderr),
        }
    }
}

/// Runs external programs.
pub trait CommandExecutor {
    /// Run to completion with stdout and stderr captured.
    fn execute(&self, program: &str, args: &[String]) -> Result<ExecOutput>;

    /// Run with `input` written to stdin and stdout captured.
    ///
    /// Stderr stays attached to the terminal so pickers like fzf can draw
    /// their interface on it.
    fn execute_with_input(&self, program: &str, args: &[String], input: &str)
    -> Result<ExecOutput>;

    /// Run with inherited stdio, blocking until the program exits.
    ///
    /// Returns the exit code (`None` when killed by a signal).
    fn execute_interactive(&self, program: &str, args: &[String]) -> Result<Option<i32>>;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
    fn execute(&self, program: &str, args: &[String]) -> Result<ExecOutput> {
        (**self).execute(program, args)
    }

    fn execute_with_input(
        &self,
        program: &str,
        args: &[String],
        input: &str,
    ) -> Result<ExecOutput> {
        (**self).execute_with_input(program, args, input)
    }

    fn execute_interactive(&self, program: &str, args: &[String]) -> Result<Option<i32>> {
        (**self).execute_interactive(program, args)
    }
}

/// [`CommandExecutor`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

fn spawn_error(program: &str, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::Config(format!("'{}' not found in PATH", program))
    } else {
        Error::Io(e)
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, program: &str, args: &[String]) -> Result<ExecOutput> {
        tracing::debug!(program, ?args, "execute");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(program, e))?;

        Ok(ExecOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn execute_with_input(
        &self,
        program: &str,
        args: &[String],
        input: &str,
    ) -> Result<ExecOutput> {
        tracing::debug!(program, ?args, lines = input.lines().count(), "execute with input");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| spawn_error(program, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A picker may exit before reading everything (e.g. on Esc).
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(Error::Io(e));
                }
            }
        }

        let output = child.wait_with_output()?;
        Ok(ExecOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::new(),
        })
    }

    fn execute_interactive(&self, program: &str, args: &[String]) -> Result<Option<i32>> {
        tracing::debug!(program, ?args, "execute interactive");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(program, e))?;
        Ok(status.code())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_includes_stderr() {
        let out = ExecOutput::failed(2, "  bad things\n");
        assert_eq!(out.failure_reason(), "exit status 2: bad things");
    }

    #[test]
    fn test_failure_reason_without_stderr() {
        let out = ExecOutput::failed(1, "");
        assert_eq!(out.failure_reason(), "exit status 1");
    }

    #[test]
    fn test_failure_reason_signal() {
        let out = ExecOutput {
            code: None,
            ..Default::default()
        };
        assert_eq!(out.failure_reason(), "terminated by signal");
    }

    #[test]
    #[cfg(unix)]
    fn test_shell_executor_captures_output() {
        let out = ShellExecutor::new()
            .execute("sh", &["-c".to_string(), "echo hi; exit 3".to_string()])
            .unwrap();
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout, "hi\n");
        assert!(!out.success());
    }

    #[test]
    #[cfg(unix)]
    fn test_shell_executor_feeds_stdin() {
        let out = ShellExecutor::new()
            .execute_with_input("sh", &["-c".to_string(), "head -n 1".to_string()], "a\nb\n")
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "a\n");
    }

    #[test]
    fn test_shell_executor_missing_program() {
        let err = ShellExecutor::new()
            .execute("hopper-definitely-not-a-real-binary", &[])
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
