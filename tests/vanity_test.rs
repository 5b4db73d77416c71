//! Request handling through the full middleware stack, in process.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use vanity_import::http::{HttpServer, X_REQUEST_ID};

mod common;

fn app(entries: &[&[&str]]) -> Router {
    HttpServer::new(common::config_with(entries)).unwrap().app()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "example.com")
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_redirect_without_go_get() {
    let app = app(&[&["/chrisify", "https://github.com/zikes/chrisify"]]);

    let res = app.oneshot(get("/chrisify")).await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[header::LOCATION], "https://github.com/zikes/chrisify");
}

#[tokio::test]
async fn test_escaped_path_matches_decoded() {
    let app = app(&[&["/$1", "https://github.com/zikes/$1"]]);

    let res = app.oneshot(get("/%66oo")).await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[header::LOCATION], "https://github.com/zikes/foo");
}

#[tokio::test]
async fn test_go_get_zero_still_redirects() {
    let app = app(&[&["/chrisify", "https://github.com/zikes/chrisify"]]);

    let res = app.oneshot(get("/chrisify?go-get=0")).await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_go_get_renders_metadata() {
    let app = app(&[&["/myrepo", "hg", "https://bitbucket.org/zikes/myrepo"]]);

    let res = app.oneshot(get("/myrepo?go-get=1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");

    let body = body_string(res).await;
    assert!(body.contains(
        r#"<meta name="go-import" content="example.com/myrepo hg https://bitbucket.org/zikes/myrepo">"#
    ));
    assert!(body.contains("go get example.com/myrepo\n"));
}

#[tokio::test]
async fn test_subpackage_metadata_names_module() {
    let app = app(&[&["/github/$1/$2", "https://github.com/$1/$2"]]);

    let res = app.oneshot(get("/github/xxx/yyy/zzz?go-get=1")).await.unwrap();
    let body = body_string(res).await;
    assert!(body.contains(
        r#"content="example.com/github/xxx/yyy git https://github.com/xxx/yyy""#
    ));
    assert!(!body.contains("zzz"));
}

#[tokio::test]
async fn test_first_match_wins() {
    let app = app(&[
        &["/$1/$2", "https://gitlab.com/exampleorg/$1/$2"],
        &["/$1", "https://gitlab.com/exampleorg/$1"],
    ]);

    let res = app.clone().oneshot(get("/backend/api")).await.unwrap();
    assert_eq!(res.headers()[header::LOCATION], "https://gitlab.com/exampleorg/backend/api");

    let res = app.oneshot(get("/api")).await.unwrap();
    assert_eq!(res.headers()[header::LOCATION], "https://gitlab.com/exampleorg/api");
}

#[tokio::test]
async fn test_unmatched_path_reaches_fallback() {
    let app = app(&[
        &["/chrisify", "https://github.com/zikes/chrisify"],
        &["/multistatus", "https://github.com/zikes/multistatus"],
    ]);

    let res = app.oneshot(get("/unknown?go-get=1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(res).await, "not found");
}

#[tokio::test]
async fn test_custom_fallback() {
    let mut config = common::config_with(&[]);
    config.fallback.status = 410;
    config.fallback.body = "gone".into();
    let app = HttpServer::new(config).unwrap().app();

    let res = app.oneshot(get("/anything")).await.unwrap();
    assert_eq!(res.status(), StatusCode::GONE);
    assert_eq!(body_string(res).await, "gone");
}

#[tokio::test]
async fn test_render_failure_is_500() {
    let app = app(&[&["/bad", "https://example.org/\u{7f}"]]);

    let res = app.oneshot(get("/bad")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_request_id_header() {
    let app = app(&[&["/chrisify", "https://github.com/zikes/chrisify"]]);

    let res = app.clone().oneshot(get("/chrisify")).await.unwrap();
    assert!(res.headers().contains_key(X_REQUEST_ID));

    let req = Request::builder()
        .uri("/chrisify")
        .header(header::HOST, "example.com")
        .header(X_REQUEST_ID, "abc-123")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.headers()[X_REQUEST_ID], "abc-123");
}
