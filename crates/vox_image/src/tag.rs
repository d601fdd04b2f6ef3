//! Image tag normalization.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9.\-]+").expect("static tag pattern"));

/// Turn an arbitrary string (usually a branch name) into a command-safe tag.
///
/// The input is lower-cased, every run of characters outside `[a-z0-9.-]`
/// becomes a single dash, and leading/trailing dashes are stripped.
///
/// ```
/// use vox_image::normalize_tag;
///
/// assert_eq!(normalize_tag("Feature/My New Branch"), "feature-my-new-branch");
/// assert_eq!(normalize_tag("v1.0.0"), "v1.0.0");
/// ```
pub fn normalize_tag(input: &str) -> String {
    let lowered = input.to_lowercase();
    DISALLOWED_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
