//! # vox_image
//!
//! Build, lint and publish orchestration for the `voxextractlabs/vox-demucs`
//! container image.
//!
//! Every external tool (docker, hadolint, git) is reached through the
//! [`ShellExecutor`] trait, so the whole workflow can be exercised without a
//! container engine.
//!
//! # Features
//!
//! - **Tag Normalization**: branch names become command-safe image tags
//! - **Build Summary**: `docker inspect` metadata parsed into [`ImageSummary`]
//! - **Lint Gate**: hadolint fails only on error-level findings
//! - **Shell Runner**: tokio process backend with live output mirroring
//! - **Mock Executor**: for testing without Docker
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vox_image::{BuildOptions, ImageBuilder, ShellRunner, ShellRunnerOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let executor = Arc::new(ShellRunner::new(ShellRunnerOptions::default()));
//!     let builder = ImageBuilder::new(BuildOptions::new("main").skip_cache(true), executor);
//!
//!     let summary = builder.build_image(None).await?;
//!     println!("Built {} ({})", summary.reference(), summary.size);
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod logger;
pub mod mock;
pub mod preflight;
pub mod shell;
pub mod summary;
pub mod tag;

pub use builder::{ImageBuilder, LOGGER_NAME};
pub use config::{
    BuildOptions, BUILD_CONTEXT, DOCKERFILE_PATH, HADOLINT_IMAGE, IMAGE_NAME, LATEST_TAG,
};
pub use error::{CommandError, CommandResult, ImageError, ImageResult};
pub use executor::{ExecOptions, ShellExecutor, ShellOutput};
pub use logger::{BuildLogger, LoggerOptions};
pub use mock::{CapturedCall, MockExecutor, MockResponse};
pub use preflight::{current_branch_name, verify_docker_installed};
pub use shell::{LogStream, ShellRunner, ShellRunnerOptions};
pub use summary::{format_size, parse_inspect, ImageSummary, InspectRecord};
pub use tag::normalize_tag;
