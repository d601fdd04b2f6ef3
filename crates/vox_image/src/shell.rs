//! Process-backed command executor.
//!
//! Runs each command string through a POSIX shell so redirects and pipes in
//! the command line behave as typed. Both output pipes are drained while the
//! child runs; lines are mirrored to our own stdout/stderr unless the call is
//! quiet, and always captured.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::error::{CommandError, CommandResult};
use crate::executor::{ExecOptions, ShellExecutor, ShellOutput};

/// Output stream of a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl std::fmt::Display for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::Stderr => write!(f, "stderr"),
        }
    }
}

/// Shell runner options.
#[derive(Debug, Clone)]
pub struct ShellRunnerOptions {
    /// Shell program invoked as `<shell> -c <command>`
    pub shell: String,
    /// Working directory for spawned commands (inherited when unset)
    pub working_dir: Option<PathBuf>,
    /// CI mode (prefix mirrored lines with timestamp and stream)
    pub ci_mode: bool,
}

impl Default for ShellRunnerOptions {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
            working_dir: None,
            ci_mode: std::env::var("CI").is_ok(),
        }
    }
}

impl ShellRunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn ci_mode(mut self, enabled: bool) -> Self {
        self.ci_mode = enabled;
        self
    }
}

/// Executes commands as child processes of a shell.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    options: ShellRunnerOptions,
}

impl ShellRunner {
    pub fn new(options: ShellRunnerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ShellRunnerOptions {
        &self.options
    }

    fn command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.options.shell);
        cmd.arg("-c").arg(command);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        if let Some(dir) = &self.options.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Drain one pipe, capturing every byte and mirroring complete lines.
async fn drain<R>(
    pipe: Option<R>,
    stream: LogStream,
    mirror: bool,
    ci_mode: bool,
) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(Vec::new());
    };

    let mut reader = BufReader::new(pipe);
    let mut captured = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        captured.extend_from_slice(&line);
        if mirror {
            mirror_line(stream, &line, ci_mode);
        }
    }
    Ok(captured)
}

fn mirror_line(stream: LogStream, line: &[u8], ci_mode: bool) {
    let text = String::from_utf8_lossy(line);
    let text = text.trim_end_matches(['\n', '\r']);
    if ci_mode {
        // GitHub Actions compatible format
        println!(
            "[{}] [{}] {}",
            Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            stream,
            text
        );
    } else {
        match stream {
            LogStream::Stdout => println!("{}", text),
            LogStream::Stderr => eprintln!("{}", text),
        }
    }
}

#[async_trait]
impl ShellExecutor for ShellRunner {
    async fn exec(&self, command: &str, options: ExecOptions) -> CommandResult<ShellOutput> {
        debug!("Executing: {} -c {}", self.options.shell, command);

        let spawn_error = |source| CommandError::Spawn {
            command: command.to_string(),
            source,
        };

        let mut child = self.command(command).spawn().map_err(spawn_error)?;
        let mirror = !options.quiet;
        let ci_mode = self.options.ci_mode;

        let (stdout, stderr, status) = tokio::try_join!(
            drain(child.stdout.take(), LogStream::Stdout, mirror, ci_mode),
            drain(child.stderr.take(), LogStream::Stderr, mirror, ci_mode),
            child.wait(),
        )
        .map_err(spawn_error)?;

        let output = ShellOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout,
            stderr,
        };
        debug!("Command exited with code {}", output.exit_code);

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
