//! vox-image CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Docker or git unavailable
//! - 3: Lint failure
//! - 4: Build failure
//! - 5: Push failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vox_image::{CommandError, ImageError};

mod commands;

use commands::{Cli, Commands, GlobalArgs};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const ENVIRONMENT_ERROR: u8 = 2;
    pub const LINT_FAILURE: u8 = 3;
    pub const BUILD_FAILURE: u8 = 4;
    pub const PUSH_FAILURE: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let Cli {
        verbose,
        silent,
        command,
    } = Cli::parse();
    let global = GlobalArgs { verbose, silent };

    init_tracing(global);

    let result = match command {
        Commands::Build(args) => commands::build::execute(args, global).await,
        Commands::Lint(args) => commands::lint::execute(args, global).await,
        Commands::Push(args) => commands::push::execute(args, global).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Default filter for our crates; `RUST_LOG` takes precedence.
fn default_directives(global: GlobalArgs) -> &'static str {
    if global.silent {
        "error"
    } else if global.verbose {
        "warn,vox_image=debug,vox_cli=debug"
    } else {
        "warn,vox_image=info,vox_cli=info"
    }
}

fn init_tracing(global: GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(global)));

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    let image_error = e.chain().find_map(|cause| cause.downcast_ref::<ImageError>());

    match image_error {
        Some(ImageError::DockerNotAvailable(_)) | Some(ImageError::Git(_)) => {
            ExitCodes::ENVIRONMENT_ERROR
        }
        Some(ImageError::Lint(_)) => ExitCodes::LINT_FAILURE,
        Some(ImageError::Build(_)) | Some(ImageError::InspectParse(_)) => ExitCodes::BUILD_FAILURE,
        Some(ImageError::Push(_)) => ExitCodes::PUSH_FAILURE,
        Some(ImageError::Command(CommandError::NonZeroExit { command, .. })) => {
            command_exit_code(command)
        }
        Some(ImageError::Command(_)) | None => ExitCodes::GENERAL_ERROR,
    }
}

/// Exit code for a command that failed outside the build/push error mapping,
/// such as the post-build `docker inspect`.
fn command_exit_code(command: &str) -> u8 {
    if command.starts_with("docker build") || command.starts_with("docker inspect") {
        ExitCodes::BUILD_FAILURE
    } else if command.starts_with("docker push") {
        ExitCodes::PUSH_FAILURE
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn test_categorize_image_errors() {
        let cases = [
            (ImageError::Lint("DL3006".into()), ExitCodes::LINT_FAILURE),
            (ImageError::Build("oops".into()), ExitCodes::BUILD_FAILURE),
            (ImageError::InspectParse("[]".into()), ExitCodes::BUILD_FAILURE),
            (ImageError::Push("denied".into()), ExitCodes::PUSH_FAILURE),
            (ImageError::Git("detached".into()), ExitCodes::ENVIRONMENT_ERROR),
            (
                ImageError::DockerNotAvailable("missing".into()),
                ExitCodes::ENVIRONMENT_ERROR,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(categorize_error(&anyhow::Error::new(err)), code);
        }
    }

    #[test]
    fn test_categorize_through_context() {
        let result: Result<(), ImageError> = Err(ImageError::Git("not a repo".into()));
        let err = result.context("No --tag given").unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::ENVIRONMENT_ERROR);
    }

    #[test]
    fn test_categorize_failed_inspect_as_build_failure() {
        let inspect = ImageError::Command(CommandError::NonZeroExit {
            command: "docker inspect voxextractlabs/vox-demucs:main".into(),
            exit_code: 1,
            stderr: "Error: No such object".into(),
        });
        assert_eq!(
            categorize_error(&anyhow::Error::new(inspect)),
            ExitCodes::BUILD_FAILURE
        );

        let other = ImageError::Command(CommandError::NonZeroExit {
            command: "docker --version".into(),
            exit_code: 127,
            stderr: String::new(),
        });
        assert_eq!(
            categorize_error(&anyhow::Error::new(other)),
            ExitCodes::GENERAL_ERROR
        );
    }

    #[test]
    fn test_categorize_other_errors() {
        assert_eq!(
            categorize_error(&anyhow::anyhow!("something else")),
            ExitCodes::GENERAL_ERROR
        );
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(GlobalArgs { verbose: false, silent: true }), "error");
        assert!(default_directives(GlobalArgs { verbose: true, silent: false }).contains("vox_image=debug"));
        assert!(default_directives(GlobalArgs::default()).contains("vox_image=info"));
    }
}
