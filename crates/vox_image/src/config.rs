//! Build configuration types.

use serde::{Deserialize, Serialize};

use crate::tag::normalize_tag;

/// Docker repository the image is published under.
pub const IMAGE_NAME: &str = "voxextractlabs/vox-demucs";

/// Build context directory passed to `docker build`.
pub const BUILD_CONTEXT: &str = "./docker";

/// Dockerfile fed to the linter.
pub const DOCKERFILE_PATH: &str = "./docker/Dockerfile";

/// Container image providing the linter.
pub const HADOLINT_IMAGE: &str = "hadolint/hadolint";

/// Tag used by the "latest" convenience workflow.
pub const LATEST_TAG: &str = "latest";

/// Options for building an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Desired tag; normalized when the builder is constructed
    pub tag_name: String,
    /// Pass `--no-cache` to the build
    pub skip_cache: bool,
    /// Suppress build output and all logging
    pub silent: bool,
    /// Enable debug logging
    pub verbose: bool,
}

impl BuildOptions {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            skip_cache: false,
            silent: false,
            verbose: false,
        }
    }

    pub fn skip_cache(mut self, skip: bool) -> Self {
        self.skip_cache = skip;
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Copy of these options with the tag normalized.
    pub fn normalized(mut self) -> Self {
        self.tag_name = normalize_tag(&self.tag_name);
        self
    }
}
