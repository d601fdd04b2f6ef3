//! Environment checks run before a build.

use tracing::debug;

use crate::error::{ImageError, ImageResult};
use crate::executor::{ExecOptions, ShellExecutor};

const DOCKER_MISSING: &str = "Docker does not appear to be installed or accessible. \
Please ensure Docker is installed and running.";

/// Fail unless `docker --version` runs successfully.
pub async fn verify_docker_installed(executor: &dyn ShellExecutor) -> ImageResult<()> {
    match executor.exec("docker --version", ExecOptions::quiet()).await {
        Ok(output) => {
            debug!("Found {}", output.text().trim());
            Ok(())
        }
        Err(e) => {
            debug!("docker --version failed: {}", e);
            Err(ImageError::DockerNotAvailable(DOCKER_MISSING.to_string()))
        }
    }
}

/// Name of the currently checked-out git branch.
pub async fn current_branch_name(executor: &dyn ShellExecutor) -> ImageResult<String> {
    let output = executor
        .exec("git rev-parse --abbrev-ref HEAD", ExecOptions::quiet())
        .await
        .map_err(|e| ImageError::Git(e.to_string()))?;

    let branch = output.text().trim().to_string();
    if branch.is_empty() {
        return Err(ImageError::Git(
            "Could not determine Git branch name.".to_string(),
        ));
    }
    Ok(branch)
}
