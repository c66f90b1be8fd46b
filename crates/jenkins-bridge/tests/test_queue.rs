//! Build queue tests

use std::time::Duration;

use jenkins_bridge::{Context, Error, ResourceRef};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{client, mount_crumb, mount_json};

#[tokio::test]
async fn test_queue_flattens_task_and_parameters() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/queue/api/json",
        json!({"items": [
            {
                "id": 101,
                "task": {"name": "deploy"},
                "why": "Waiting for next available executor",
                "buildable": true,
                "inQueueSince": 1_700_000_000_000_i64,
                "actions": [{}, {"parameters": [{"name": "BRANCH", "value": "main"}, {"name": "DRY_RUN", "value": true}]}]
            },
            {
                "id": 102,
                "task": {"name": "lint"},
                "why": null,
                "blocked": true,
                "params": "\nTARGET=eu\nVERSION=1.2=rc"
            }
        ]}),
    )
    .await;

    let items = client(&server)
        .queue()
        .list(&Context::background())
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 101);
    assert_eq!(items[0].job_name, "deploy");
    assert_eq!(items[0].parameters.get("BRANCH").map(String::as_str), Some("main"));
    assert_eq!(items[0].parameters.get("DRY_RUN").map(String::as_str), Some("true"));
    assert!(items[0].buildable);

    assert_eq!(items[1].job_name, "lint");
    assert_eq!(items[1].why, "");
    assert!(items[1].blocked);
    assert_eq!(items[1].parameters.get("TARGET").map(String::as_str), Some("eu"));
    assert_eq!(items[1].parameters.get("VERSION").map(String::as_str), Some("1.2=rc"));
}

#[tokio::test]
async fn test_empty_queue() {
    let server = MockServer::start().await;
    mount_json(&server, "/queue/api/json", json!({"items": []})).await;

    let items = client(&server)
        .queue()
        .list(&Context::background())
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_get_queue_item_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/queue/item/5/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .queue()
        .get(&Context::background(), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(ResourceRef::QueueItem { id: 5 })));
}

#[tokio::test]
async fn test_queue_id_zero_rejected() {
    let server = MockServer::start().await;
    let err = client(&server)
        .queue()
        .get(&Context::background(), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_cancel_queue_item() {
    let server = MockServer::start().await;
    mount_crumb(&server).await;
    Mock::given(method("POST"))
        .and(path("/queue/cancelItem"))
        .and(query_param("id", "101"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/queue/"))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .queue()
        .cancel(&Context::background(), 101)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wait_for_build_polls_until_started() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/queue/item/17/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 17, "task": {"name": "deploy"}, "why": "Waiting for next available executor", "executable": null
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/queue/item/17/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 17, "task": {"name": "deploy"},
            "executable": {"number": 43, "url": "http://jenkins.local/job/deploy/43/"}
        })))
        .mount(&server)
        .await;

    let build = client(&server)
        .queue()
        .wait_for_build(&Context::background(), 17, Duration::from_millis(10))
        .await
        .unwrap();

    assert_eq!(build.number, 43);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_wait_for_build_sees_cancellation() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/queue/item/18/api/json",
        json!({"id": 18, "task": {"name": "deploy"}, "cancelled": true}),
    )
    .await;

    let err = client(&server)
        .queue()
        .wait_for_build(&Context::background(), 18, Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::QueueItemCancelled(18)));
}

#[tokio::test]
async fn test_wait_for_build_honours_deadline() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/queue/item/19/api/json",
        json!({"id": 19, "task": {"name": "deploy"}, "why": "Blocked"}),
    )
    .await;

    let ctx = Context::with_timeout(Duration::from_millis(100));
    let err = client(&server)
        .queue()
        .wait_for_build(&ctx, 19, Duration::from_millis(20))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
}
