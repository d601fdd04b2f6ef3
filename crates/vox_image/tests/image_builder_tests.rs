//! Integration tests for the image orchestration workflow.
//!
//! These tests drive `ImageBuilder` through the scripted `MockExecutor`,
//! so no Docker installation is required.

use std::sync::Arc;

use vox_image::{
    BuildOptions, ImageBuilder, ImageError, MockExecutor, MockResponse, ShellExecutor,
};

const FAKE_INSPECT: &str = r#"[{"Id":"fake-id-123","Os":"linux","Author":"Test Author","Size":4200000000,"VirtualSize":4300000000,"Created":"2023-03-21T12:00:00Z"}]"#;

/// Executor answering like a healthy engine.
fn stub_executor() -> MockExecutor {
    MockExecutor::new()
        .on("docker build", MockResponse::success("Build successful"))
        .on("docker inspect", MockResponse::success(FAKE_INSPECT))
        .on("docker push", MockResponse::success("Push successful"))
}

fn builder(options: BuildOptions, executor: &MockExecutor) -> ImageBuilder {
    let executor: Arc<dyn ShellExecutor> = Arc::new(executor.clone());
    ImageBuilder::new(options, executor)
}

/// Test tag normalization at construction.
#[test]
fn test_normalizes_tag_name() {
    let builder = builder(BuildOptions::new("Feature/My New Branch"), &stub_executor());
    assert_eq!(builder.tag_name(), "feature-my-new-branch");
}

/// Test a successful build returns the parsed summary.
#[tokio::test]
async fn test_build_image_returns_summary() {
    let executor = stub_executor();
    let builder = builder(BuildOptions::new("Test-Tag"), &executor);

    let summary = builder.build_image(None).await.unwrap();

    assert_eq!(summary.image_name, "voxextractlabs/vox-demucs");
    assert_eq!(summary.tag, "test-tag");
    assert_eq!(summary.id, "fake-id-123");
    assert_eq!(summary.os, "linux");
    assert_eq!(summary.author, "Test Author");
    assert_eq!(summary.size, "4.2 GB");
    assert_eq!(summary.virtual_size, "4.3 GB");
    assert!(!summary.created.is_empty());

    let calls = executor.get_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].command,
        "docker build -t voxextractlabs/vox-demucs:test-tag ./docker"
    );
    assert_eq!(
        calls[1].command,
        "docker inspect voxextractlabs/vox-demucs:test-tag"
    );
    assert!(calls[1].options.quiet);
}

/// Test cache bypass flag.
#[tokio::test]
async fn test_skip_cache_adds_no_cache_flag() {
    let executor = stub_executor();
    let builder = builder(BuildOptions::new("main").skip_cache(true), &executor);

    builder.build_image(None).await.unwrap();

    let build = &executor.get_matching_calls("docker build")[0];
    assert!(build.command.contains(" --no-cache "));
}

/// Test build output visibility follows the silent flag.
#[tokio::test]
async fn test_build_exec_options_follow_silent() {
    let loud = stub_executor();
    builder(BuildOptions::new("main"), &loud)
        .build_image(None)
        .await
        .unwrap();
    let options = loud.get_matching_calls("docker build")[0].options;
    assert!(!options.quiet);
    assert!(options.should_throw);

    let silent = stub_executor();
    builder(BuildOptions::new("main").silent(true), &silent)
        .build_image(None)
        .await
        .unwrap();
    let options = silent.get_matching_calls("docker build")[0].options;
    assert!(options.quiet);
    assert!(!options.should_throw);
}

/// Test a failed silent build stops before inspect.
#[tokio::test]
async fn test_failed_build_skips_inspect() {
    let executor = MockExecutor::new()
        .on("docker build", MockResponse::failure(1, "failed to solve: dockerfile parse error"))
        .on("docker inspect", MockResponse::success(FAKE_INSPECT));
    let builder = builder(BuildOptions::new("main").silent(true), &executor);

    let result = builder.build_image(None).await;

    match result {
        Err(ImageError::Build(stderr)) => assert!(stderr.contains("dockerfile parse error")),
        other => panic!("Expected Build error, got {:?}", other),
    }
    assert!(!executor.was_called("docker inspect"));
}

/// Test a failed build with live output also stops before inspect.
#[tokio::test]
async fn test_failed_loud_build_is_build_error() {
    let executor = MockExecutor::new()
        .on("docker build", MockResponse::failure(1, "no space left on device"))
        .on("docker inspect", MockResponse::success(FAKE_INSPECT));
    let builder = builder(BuildOptions::new("main"), &executor);

    assert!(matches!(
        builder.build_image(None).await,
        Err(ImageError::Build(_))
    ));
    assert_eq!(executor.call_count(), 1);
}

/// Test unusable inspect output is a distinct failure.
#[tokio::test]
async fn test_bad_inspect_output_is_parse_error() {
    for inspect in ["[]", "not json", r#"[{"Id": "only-id"}]"#] {
        let executor = MockExecutor::new().on("docker inspect", MockResponse::success(inspect));
        let builder = builder(BuildOptions::new("main"), &executor);

        assert!(
            matches!(builder.build_image(None).await, Err(ImageError::InspectParse(_))),
            "inspect output {:?} should not parse",
            inspect
        );
    }
}

/// Test push returns the engine output.
#[tokio::test]
async fn test_push_image_returns_output() {
    let executor = stub_executor();
    let builder = builder(BuildOptions::new("Test-Tag"), &executor);

    let output = builder.push_image(None).await.unwrap();

    assert!(output.contains("Push successful"));
    let push = &executor.get_calls()[0];
    assert_eq!(push.command, "docker push voxextractlabs/vox-demucs:test-tag");
    assert!(push.options.quiet);
    assert!(push.options.should_throw);
}

/// Test push failure carries stderr.
#[tokio::test]
async fn test_push_failure() {
    let executor = MockExecutor::new().on(
        "docker push",
        MockResponse::failure(1, "unauthorized: authentication required"),
    );
    let builder = builder(BuildOptions::new("main"), &executor);

    match builder.push_image(Some("v2.0.0")).await {
        Err(ImageError::Push(stderr)) => assert!(stderr.contains("unauthorized")),
        other => panic!("Expected Push error, got {:?}", other),
    }
    assert!(executor.was_called("vox-demucs:v2.0.0"));
}

/// Test the latest workflow builds then pushes the latest tag.
#[tokio::test]
async fn test_push_latest() {
    let executor = stub_executor();
    let builder = builder(BuildOptions::new("feature-x"), &executor);

    let output = builder.push_latest().await.unwrap();
    assert_eq!(output, "Push successful");

    let commands: Vec<String> = executor.get_calls().into_iter().map(|c| c.command).collect();
    assert_eq!(
        commands,
        vec![
            "docker build -t voxextractlabs/vox-demucs:latest ./docker".to_string(),
            "docker inspect voxextractlabs/vox-demucs:latest".to_string(),
            "docker push voxextractlabs/vox-demucs:latest".to_string(),
        ]
    );
    assert_eq!(builder.tag_name(), "feature-x");
}

/// Test the latest workflow does not push after a failed build.
#[tokio::test]
async fn test_push_latest_aborts_on_build_failure() {
    let executor = MockExecutor::new()
        .on("docker build", MockResponse::failure(2, "build broke"))
        .on("docker push", MockResponse::success("Push successful"))
        .with_default(MockResponse::success(""));
    let builder = builder(BuildOptions::new("main"), &executor);

    assert!(builder.push_latest().await.is_err());
    assert!(!executor.was_called("docker push"));
}

/// Test lint passes and returns trimmed output.
#[tokio::test]
async fn test_lint_success() {
    let executor = MockExecutor::new().on(
        "hadolint",
        MockResponse::success("\n-:12 DL3008 warning: Pin versions in apt get install\n\n"),
    );
    let builder = builder(BuildOptions::new("main"), &executor);

    let output = builder.lint().await.unwrap();
    assert_eq!(output, "-:12 DL3008 warning: Pin versions in apt get install");

    let call = &executor.get_calls()[0];
    assert!(call.command.contains("--failure-threshold=error"));
    assert!(call.command.ends_with("< ./docker/Dockerfile"));
    assert!(call.options.quiet);
    assert!(!call.options.should_throw);
}

/// Test lint failure message is exactly the trimmed output.
#[tokio::test]
async fn test_lint_failure() {
    let executor = MockExecutor::new().on(
        "hadolint",
        MockResponse::failure(1, "").with_stdout("  -:1 DL3006 error: Always tag the image  \n"),
    );
    let builder = builder(BuildOptions::new("main"), &executor);

    let err = builder.lint().await.unwrap_err();
    assert!(matches!(err, ImageError::Lint(_)));
    assert_eq!(err.to_string(), "-:1 DL3006 error: Always tag the image");
}

/// Test executor-level failures surface untouched.
#[tokio::test]
async fn test_spawn_failure_propagates() {
    let executor = MockExecutor::new().simulate_failure("sh: cannot fork");
    let builder = builder(BuildOptions::new("main"), &executor);

    assert!(matches!(builder.lint().await, Err(ImageError::Command(_))));
    assert!(matches!(
        builder.build_image(None).await,
        Err(ImageError::Command(_))
    ));
}

/// Test independent builders can run concurrently on one executor.
#[tokio::test]
async fn test_concurrent_builders() {
    let executor = stub_executor();
    let first = builder(BuildOptions::new("alpha"), &executor);
    let second = builder(BuildOptions::new("beta"), &executor);

    let (a, b) = tokio::join!(first.build_image(None), second.build_image(None));

    assert_eq!(a.unwrap().tag, "alpha");
    assert_eq!(b.unwrap().tag, "beta");
    assert_eq!(executor.call_count(), 4);
}
