//! Error types for image orchestration.

use thiserror::Error;

/// Result type alias for executor calls.
pub type CommandResult<T> = Result<T, CommandError>;

/// Result type alias for orchestrator operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// Errors raised by a [`ShellExecutor`](crate::executor::ShellExecutor) itself.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` exited with code {exit_code}: {stderr}")]
    NonZeroExit {
        command: String,
        exit_code: i32,
        stderr: String,
    },
}

/// Errors that can occur while building, inspecting, pushing or linting an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Docker build failed: {0}")]
    Build(String),

    #[error("Failed to parse image metadata: {0}")]
    InspectParse(String),

    #[error("Docker push failed: {0}")]
    Push(String),

    /// Display is the linter output and nothing else.
    #[error("{0}")]
    Lint(String),

    #[error("{0}")]
    DockerNotAvailable(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl ImageError {
    /// Map an executor failure raised during a build step.
    ///
    /// A thrown non-zero exit becomes [`ImageError::Build`]; spawn failures
    /// are kept as they are.
    pub(crate) fn from_build(err: CommandError) -> Self {
        match err {
            CommandError::NonZeroExit { stderr, .. } => Self::Build(stderr),
            other => Self::Command(other),
        }
    }

    /// Map an executor failure raised during a push step.
    pub(crate) fn from_push(err: CommandError) -> Self {
        match err {
            CommandError::NonZeroExit { stderr, .. } => Self::Push(stderr),
            other => Self::Command(other),
        }
    }
}
