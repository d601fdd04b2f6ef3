//! Push command - Push an already built image.

use anyhow::Result;
use clap::Args;

use vox_image::{verify_docker_installed, BuildOptions, ImageBuilder};

use super::{resolve_tag, shell_executor, GlobalArgs};

#[derive(Args)]
pub struct PushArgs {
    /// Image tag (defaults to the current git branch)
    #[arg(short, long, env = "VOX_IMAGE_TAG")]
    pub tag: Option<String>,

    /// Rebuild and push the `latest` tag after the branch tag
    #[arg(long)]
    pub latest: bool,
}

pub async fn execute(args: PushArgs, global: GlobalArgs) -> Result<()> {
    let executor = shell_executor();
    verify_docker_installed(executor.as_ref()).await?;

    let tag = resolve_tag(executor.as_ref(), args.tag).await?;
    let options = BuildOptions::new(tag)
        .silent(global.silent)
        .verbose(global.verbose);
    let builder = ImageBuilder::new(options, executor);

    let output = builder.push_image(None).await?;
    if !global.silent {
        print!("{}", output);
    }

    if args.latest {
        let output = builder.push_latest().await?;
        if !global.silent {
            print!("{}", output);
        }
    }
    Ok(())
}
