//! Mock command executor for testing.
//!
//! Provides a scriptable implementation of the ShellExecutor trait
//! for use in tests without requiring Docker, git or a shell.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{CommandError, CommandResult};
use crate::executor::{ExecOptions, ShellExecutor, ShellOutput};

/// Predefined mock response for a command.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Set stdout on a failing response (linters report findings there).
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    fn to_output(&self) -> ShellOutput {
        ShellOutput::new(
            self.exit_code,
            self.stdout.as_bytes(),
            self.stderr.as_bytes(),
        )
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    pub command: String,
    pub options: ExecOptions,
}

/// Mock command executor.
///
/// Commands are matched against rules in insertion order by substring; the
/// first match wins and unmatched commands get the default response. Every
/// call is captured, and `should_throw` is honored the same way the real
/// shell backend honors it.
#[derive(Clone)]
pub struct MockExecutor {
    /// (substring, response) pairs.
    rules: Arc<RwLock<Vec<(String, MockResponse)>>>,
    /// Response for commands no rule matches.
    default_response: Arc<RwLock<MockResponse>>,
    /// Captured calls for verification.
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    /// Simulated spawn failure message.
    simulate_failure: Arc<RwLock<Option<String>>>,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        Self {
            rules: Arc::new(RwLock::new(Vec::new())),
            default_response: Arc::new(RwLock::new(MockResponse::success(""))),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
            simulate_failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Respond with `response` to any command containing `pattern`.
    pub fn on(self, pattern: impl Into<String>, response: MockResponse) -> Self {
        self.rules.write().push((pattern.into(), response));
        self
    }

    /// Set the response for unmatched commands.
    pub fn with_default(self, response: MockResponse) -> Self {
        *self.default_response.write() = response;
        self
    }

    /// Make every call fail as if the process could not be spawned.
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_failure.write() = Some(message.into());
        self
    }

    /// Clear all captured calls.
    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Check if any command containing `pattern` was executed.
    pub fn was_called(&self, pattern: &str) -> bool {
        self.captured_calls
            .read()
            .iter()
            .any(|c| c.command.contains(pattern))
    }

    /// Get calls whose command contains `pattern`.
    pub fn get_matching_calls(&self, pattern: &str) -> Vec<CapturedCall> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.command.contains(pattern))
            .cloned()
            .collect()
    }

    fn response_for(&self, command: &str) -> MockResponse {
        self.rules
            .read()
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.read().clone())
    }
}

#[async_trait]
impl ShellExecutor for MockExecutor {
    async fn exec(&self, command: &str, options: ExecOptions) -> CommandResult<ShellOutput> {
        self.captured_calls.write().push(CapturedCall {
            command: command.to_string(),
            options,
        });

        if let Some(msg) = self.simulate_failure.read().clone() {
            return Err(CommandError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, msg),
            });
        }

        let output = self.response_for(command).to_output();
        if options.should_throw && !output.success() {
            return Err(CommandError::NonZeroExit {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr_text(),
            });
        }
        Ok(output)
    }
}
