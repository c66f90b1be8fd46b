//! Build stop protocol tests

use jenkins_bridge::{BuildResult, Context, Error};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{build_json, client, mount_crumb};

const BUILD_PATH: &str = "/job/deploy/42/api/json";
const STOP_PATH: &str = "/job/deploy/42/stop";

/// Serve `first` once, then `then` for every later read.
async fn mount_build_sequence(
    server: &MockServer,
    first: serde_json::Value,
    then: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(BUILD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(BUILD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(then))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_stop_finished_build_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BUILD_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(build_json("deploy", 42, false, Some("SUCCESS"))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .builds()
        .stop(&Context::background(), "deploy", 42)
        .await
        .unwrap_err();

    match err {
        Error::BuildNotRunning {
            job,
            number,
            result,
        } => {
            assert_eq!(job, "deploy");
            assert_eq!(number, 42);
            assert_eq!(result, Some(BuildResult::Success));
        }
        other => panic!("Expected BuildNotRunning, got {:?}", other),
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_stop_running_build_verifies_abort() {
    let server = MockServer::start().await;
    mount_crumb(&server).await;
    mount_build_sequence(
        &server,
        build_json("deploy", 42, true, None),
        build_json("deploy", 42, false, Some("ABORTED")),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(STOP_PATH))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/job/deploy/42/"))
        .expect(1)
        .mount(&server)
        .await;

    let build = client(&server)
        .builds()
        .stop(&Context::background(), "deploy", 42)
        .await
        .unwrap();

    assert!(!build.building);
    assert_eq!(build.result, Some(BuildResult::Aborted));
}

#[tokio::test]
async fn test_stop_build_still_running() {
    let server = MockServer::start().await;
    mount_crumb(&server).await;
    mount_build_sequence(
        &server,
        build_json("deploy", 42, true, None),
        build_json("deploy", 42, true, None),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(STOP_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client(&server)
        .builds()
        .stop(&Context::background(), "deploy", 42)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BuildStillRunning { number: 42, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_stop_build_finished_differently() {
    let server = MockServer::start().await;
    mount_crumb(&server).await;
    mount_build_sequence(
        &server,
        build_json("deploy", 42, true, None),
        build_json("deploy", 42, false, Some("SUCCESS")),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(STOP_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client(&server)
        .builds()
        .stop(&Context::background(), "deploy", 42)
        .await
        .unwrap_err();
    match err {
        Error::UnexpectedBuildResult {
            expected, actual, ..
        } => {
            assert_eq!(expected, BuildResult::Aborted);
            assert_eq!(actual, Some(BuildResult::Success));
        }
        other => panic!("Expected UnexpectedBuildResult, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stop_rejected_by_server() {
    let server = MockServer::start().await;
    mount_crumb(&server).await;
    mount_build_sequence(
        &server,
        build_json("deploy", 42, true, None),
        build_json("deploy", 42, true, None),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(STOP_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client(&server)
        .builds()
        .stop(&Context::background(), "deploy", 42)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(_)));
}
