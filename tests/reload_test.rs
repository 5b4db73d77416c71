//! Live server tests: real sockets, hot reload, shutdown.

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::header::LOCATION;

mod common;

#[tokio::test]
async fn test_live_redirect_and_metadata() {
    let server = common::start_server(common::config_with(&[&[
        "/github/$1/$2",
        "https://github.com/$1/$2",
    ]]))
    .await;
    let client = common::client();

    let res = client.get(server.url("/github/xxx/yyy/zzz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[LOCATION], "https://github.com/xxx/yyy");

    let res = client
        .get(server.url("/github/xxx/yyy?go-get=1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    let host = server.addr.to_string();
    assert!(body.contains(&format!("go get {host}/github/xxx/yyy")));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_config_update_swaps_matchers() {
    let server = common::start_server(common::config_with(&[&["/old", "https://example.org/old"]])).await;
    let client = common::client();

    let res = client.get(server.url("/old")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

    // A broken update is rejected and the old list keeps serving.
    server
        .updates
        .send(common::config_with(&[&["/$2", "https://example.org/$2"]]))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let res = client.get(server.url("/old")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

    server
        .updates
        .send(common::config_with(&[&["/new", "https://example.org/new"]]))
        .unwrap();

    let mut swapped = false;
    for _ in 0..20 {
        let res = client.get(server.url("/new")).send().await.unwrap();
        if res.status() == StatusCode::TEMPORARY_REDIRECT {
            assert_eq!(res.headers()[LOCATION], "https://example.org/new");
            swapped = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(swapped, "new configuration was never published");

    let res = client.get(server.url("/old")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let server = common::start_server(common::config_with(&[])).await;
    let client = common::client();

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(client.get(server.url("/")).send().await.is_err());
}
