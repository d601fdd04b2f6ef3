//! Command executor trait and types.

use async_trait::async_trait;

use crate::error::CommandResult;

/// Options controlling a single command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    /// Do not mirror the command's output to our own stdout/stderr.
    /// Output is captured either way.
    pub quiet: bool,
    /// Fail the call with [`CommandError::NonZeroExit`](crate::CommandError::NonZeroExit)
    /// when the command exits non-zero, instead of returning the output.
    pub should_throw: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            should_throw: true,
        }
    }
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quiet execution that still fails on non-zero exit.
    pub fn quiet() -> Self {
        Self::default().with_quiet(true)
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_should_throw(mut self, should_throw: bool) -> Self {
        self.should_throw = should_throw;
        self
    }
}

/// Captured result of an executed command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    /// Process exit code (-1 when terminated by a signal)
    pub exit_code: i32,
    /// Raw stdout bytes
    pub stdout: Vec<u8>,
    /// Raw stderr bytes
    pub stderr: Vec<u8>,
}

impl ShellOutput {
    pub fn new(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Check if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout decoded as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr decoded as text.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Get combined output (stdout + stderr).
    pub fn combined_output(&self) -> String {
        let stdout = self.text();
        let stderr = self.stderr_text();
        if stdout.is_empty() {
            stderr
        } else if stderr.is_empty() {
            stdout
        } else {
            format!("{}\n{}", stdout, stderr)
        }
    }
}

/// Runs shell command strings.
///
/// This is the only way the orchestrator reaches external processes, so any
/// backend implementing it (a real shell, a scripted mock) is substitutable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShellExecutor: Send + Sync {
    /// Execute `command` and wait for it to exit.
    async fn exec(&self, command: &str, options: ExecOptions) -> CommandResult<ShellOutput>;
}
