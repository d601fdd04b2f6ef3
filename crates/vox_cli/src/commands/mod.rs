//! CLI command definitions.
//!
//! Each subcommand maps to one workflow of the image builder.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use vox_image::{
    current_branch_name, normalize_tag, ShellExecutor, ShellRunner, ShellRunnerOptions,
};

pub mod build;
pub mod lint;
pub mod push;

/// vox-image - build, lint and publish the vox-demucs container image
#[derive(Parser)]
#[command(name = "vox-image")]
#[command(version, about = "Build, lint and publish the vox-demucs container image")]
#[command(long_about = r#"
Builds the voxextractlabs/vox-demucs image from ./docker, lints its
Dockerfile with hadolint and pushes it to the registry. The image tag
defaults to the current git branch, normalized to a valid Docker tag.

WORKFLOWS:
  build  → lint, build, summarize and (unless --no-push) push
  lint   → lint the Dockerfile only
  push   → push an already built tag

EXIT CODES:
  0 - Success
  1 - General error
  2 - Docker or git unavailable
  3 - Lint failure
  4 - Build failure (including a failed image inspect)
  5 - Push failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, visible_alias = "quiet")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint, build and push the image
    Build(build::BuildArgs),

    /// Lint the Dockerfile
    Lint(lint::LintArgs),

    /// Push an already built image
    Push(push::PushArgs),
}

/// Flags shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalArgs {
    pub verbose: bool,
    pub silent: bool,
}

/// Executor backing every command.
pub fn shell_executor() -> Arc<dyn ShellExecutor> {
    Arc::new(ShellRunner::new(ShellRunnerOptions::default()))
}

/// Use the explicit tag, or fall back to the current git branch.
///
/// Fails when the tag has no characters left after normalization.
pub async fn resolve_tag(executor: &dyn ShellExecutor, tag: Option<String>) -> Result<String> {
    let tag = match tag {
        Some(tag) => tag,
        None => current_branch_name(executor)
            .await
            .context("No --tag given and the current git branch could not be determined")?,
    };

    if normalize_tag(&tag).is_empty() {
        bail!("Tag {:?} does not contain any valid Docker tag characters", tag);
    }
    Ok(tag)
}
