//! Build command - Lint, build, summarize and push the image.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use vox_image::{verify_docker_installed, BuildOptions, ImageBuilder};

use super::{resolve_tag, shell_executor, GlobalArgs};

#[derive(Args)]
pub struct BuildArgs {
    /// Image tag (defaults to the current git branch)
    #[arg(short, long, env = "VOX_IMAGE_TAG")]
    pub tag: Option<String>,

    /// Build without the layer cache
    #[arg(long)]
    pub no_cache: bool,

    /// Build only, do not push
    #[arg(long)]
    pub no_push: bool,

    /// Also build and push the `latest` tag
    #[arg(long, conflicts_with = "no_push")]
    pub latest: bool,

    /// Skip the Dockerfile lint
    #[arg(long)]
    pub skip_lint: bool,

    /// Print the build summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: BuildArgs, global: GlobalArgs) -> Result<()> {
    let executor = shell_executor();
    verify_docker_installed(executor.as_ref()).await?;

    let tag = resolve_tag(executor.as_ref(), args.tag).await?;
    let options = BuildOptions::new(tag)
        .skip_cache(args.no_cache)
        .silent(global.silent)
        .verbose(global.verbose);
    let builder = ImageBuilder::new(options, executor);
    info!("Using image tag: {}", builder.tag_name());

    if !args.skip_lint {
        builder.lint().await?;
    }

    let summary = builder.build_image(None).await?;
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", json);
    } else if !global.silent {
        println!("{}", summary);
    }

    if args.no_push {
        info!("Skipping push (--no-push)");
        return Ok(());
    }

    builder.push_image(None).await?;
    if args.latest {
        builder.push_latest().await?;
    }

    if !global.silent && !args.json {
        println!();
        println!("✅ Published {}", summary.reference());
    }
    Ok(())
}
