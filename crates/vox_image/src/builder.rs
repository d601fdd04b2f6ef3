//! Image build, push and lint orchestration.
//!
//! [`ImageBuilder`] owns a normalized [`BuildOptions`] and routes every
//! external command through an injected [`ShellExecutor`]. It never spawns
//! processes itself.

use std::sync::Arc;

use serde_json::json;

use crate::config::{
    BuildOptions, BUILD_CONTEXT, DOCKERFILE_PATH, HADOLINT_IMAGE, IMAGE_NAME, LATEST_TAG,
};
use crate::error::{ImageError, ImageResult};
use crate::executor::{ExecOptions, ShellExecutor};
use crate::logger::{BuildLogger, LoggerOptions};
use crate::summary::{parse_inspect, ImageSummary};
use crate::tag::normalize_tag;

/// Name attached to every log event of a builder.
pub const LOGGER_NAME: &str = "ImageBuilder";

/// Builds, lints and pushes the `voxextractlabs/vox-demucs` image.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use vox_image::{BuildOptions, ImageBuilder, ShellRunner};
///
/// # async fn run() -> Result<(), vox_image::ImageError> {
/// let builder = ImageBuilder::new(
///     BuildOptions::new("Feature/My Branch").verbose(true),
///     Arc::new(ShellRunner::default()),
/// );
/// assert_eq!(builder.tag_name(), "feature-my-branch");
///
/// builder.lint().await?;
/// let summary = builder.build_image(None).await?;
/// println!("{}", summary);
/// builder.push_image(None).await?;
/// # Ok(())
/// # }
/// ```
pub struct ImageBuilder {
    image_name: String,
    options: BuildOptions,
    logger: BuildLogger,
    executor: Arc<dyn ShellExecutor>,
}

impl ImageBuilder {
    /// Create a builder. The tag is normalized here, once.
    pub fn new(options: BuildOptions, executor: Arc<dyn ShellExecutor>) -> Self {
        let options = options.normalized();
        let logger = BuildLogger::new(
            &LoggerOptions::new(LOGGER_NAME)
                .silent(options.silent)
                .verbose(options.verbose),
        );

        Self {
            image_name: IMAGE_NAME.to_string(),
            options,
            logger,
            executor,
        }
    }

    /// Normalized image tag.
    pub fn tag_name(&self) -> &str {
        &self.options.tag_name
    }

    /// Whether builds bypass the layer cache.
    pub fn skip_cache(&self) -> bool {
        self.options.skip_cache
    }

    /// Whether the builder runs silent.
    pub fn is_silent(&self) -> bool {
        self.options.silent
    }

    /// Repository name.
    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn logger(&self) -> &BuildLogger {
        &self.logger
    }

    fn resolve_tag(&self, tag_override: Option<&str>) -> String {
        match tag_override {
            Some(tag) => normalize_tag(tag),
            None => self.options.tag_name.clone(),
        }
    }

    fn reference(&self, tag: &str) -> String {
        format!("{}:{}", self.image_name, tag)
    }

    /// `docker build` command line for `tag`.
    pub fn build_command(&self, tag: &str) -> String {
        let mut cmd = "docker build".to_string();
        if self.options.skip_cache {
            cmd.push_str(" --no-cache");
        }
        cmd.push_str(&format!(" -t {} {}", self.reference(tag), BUILD_CONTEXT));
        cmd
    }

    /// `docker inspect` command line for `tag`.
    pub fn inspect_command(&self, tag: &str) -> String {
        format!("docker inspect {}", self.reference(tag))
    }

    /// `docker push` command line for `tag`.
    pub fn push_command(&self, tag: &str) -> String {
        format!("docker push {}", self.reference(tag))
    }

    /// Hadolint run over the Dockerfile. Only findings at `error` severity
    /// or above make it exit non-zero.
    pub fn lint_command() -> String {
        format!(
            "docker run --rm -i --entrypoint=hadolint {} --failure-threshold=error - < {}",
            HADOLINT_IMAGE, DOCKERFILE_PATH
        )
    }

    /// Build the image and return a summary of its metadata.
    ///
    /// `tag_override` replaces the configured tag for both the build and the
    /// metadata lookup.
    pub async fn build_image(&self, tag_override: Option<&str>) -> ImageResult<ImageSummary> {
        let tag = self.resolve_tag(tag_override);
        self.logger.info_with(
            &json!({ "image": self.image_name, "tag": tag }),
            "Building Docker image",
        );

        let silent = self.is_silent();
        let options = ExecOptions::new()
            .with_quiet(silent)
            .with_should_throw(!silent);

        let result = self
            .executor
            .exec(&self.build_command(&tag), options)
            .await
            .map_err(ImageError::from_build)
            .inspect_err(|e| self.logger.error(e))?;

        if !result.success() {
            let stderr = result.stderr_text();
            self.logger.error_with(
                &json!({ "exit_code": result.exit_code }),
                format!("Docker build failed:\n{}", stderr.trim()),
            );
            return Err(ImageError::Build(stderr));
        }

        let inspect = self
            .executor
            .exec(&self.inspect_command(&tag), ExecOptions::quiet())
            .await
            .inspect_err(|e| self.logger.error(e))?;

        let summary = parse_inspect(&inspect.text())
            .and_then(|record| ImageSummary::from_record(&self.image_name, &tag, record))
            .inspect_err(|e| self.logger.error(e))?;

        self.logger.info_with(&summary, "Build Summary");
        Ok(summary)
    }

    /// Push the image and return the engine's output.
    pub async fn push_image(&self, tag_override: Option<&str>) -> ImageResult<String> {
        let tag = self.resolve_tag(tag_override);
        self.logger.info_with(
            &json!({ "image": self.image_name, "tag": tag }),
            "Pushing Docker image",
        );

        let result = self
            .executor
            .exec(&self.push_command(&tag), ExecOptions::quiet())
            .await
            .map_err(ImageError::from_push)
            .inspect_err(|e| self.logger.error(e))?;

        // Executors that ignore should_throw still end up here.
        if !result.success() {
            let stderr = result.stderr_text();
            self.logger
                .error(format!("Docker push failed:\n{}", stderr.trim()));
            return Err(ImageError::Push(stderr));
        }

        let output = result.text();
        self.logger.info(format!("Push Result:\n{}", output.trim_end()));
        Ok(output)
    }

    /// Build and push under the `latest` tag.
    pub async fn push_latest(&self) -> ImageResult<String> {
        self.build_image(Some(LATEST_TAG)).await?;
        self.push_image(Some(LATEST_TAG)).await
    }

    /// Lint the Dockerfile and return the linter's trimmed output.
    ///
    /// Warnings are reported in the output but do not fail the call.
    pub async fn lint(&self) -> ImageResult<String> {
        self.logger.info("Linting Docker file");

        let result = self
            .executor
            .exec(
                &Self::lint_command(),
                ExecOptions::quiet().with_should_throw(false),
            )
            .await
            .inspect_err(|e| self.logger.error(e))?;

        let output = result.combined_output().trim().to_string();

        if !result.success() {
            self.logger.error(format!(
                "Linting failed with exit code {}:\n{}",
                result.exit_code, output
            ));
            return Err(ImageError::Lint(output));
        }

        self.logger.info(format!("Linting passed:\n{}", output));
        Ok(output)
    }
}
