//! Lint command - Run hadolint over the Dockerfile.

use anyhow::Result;
use clap::Args;

use vox_image::{verify_docker_installed, BuildOptions, ImageBuilder, LATEST_TAG};

use super::{shell_executor, GlobalArgs};

#[derive(Args)]
pub struct LintArgs {}

pub async fn execute(_args: LintArgs, global: GlobalArgs) -> Result<()> {
    let executor = shell_executor();
    verify_docker_installed(executor.as_ref()).await?;

    // Lint does not depend on the tag.
    let options = BuildOptions::new(LATEST_TAG)
        .silent(global.silent)
        .verbose(global.verbose);
    let output = ImageBuilder::new(options, executor).lint().await?;

    if !global.silent {
        if !output.is_empty() {
            println!("{}", output);
        }
        println!("✅ Dockerfile lint passed");
    }
    Ok(())
}
