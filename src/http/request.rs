//! Request inspection.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Extract the host and the `go-get` flag that resolution needs
//!
//! # Design Decisions
//! - Request ID added as early as possible; an inbound `x-request-id` is kept
//! - Host is taken verbatim from the `Host` header, then the URI authority
//! - Paths are percent-decoded before matching; malformed escapes stay raw

use axum::extract::Query;
use axum::http::{header, HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Query parameter set by `go get` when it fetches import metadata.
pub const GO_GET_PARAM: &str = "go-get";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The request host as the client sent it, or empty when absent.
pub fn request_host<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.as_str().to_string()))
        .unwrap_or_default()
}

/// The request path with percent-escapes decoded.
pub fn request_path(uri: &Uri) -> String {
    let raw = uri.path();
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// True when the first `go-get` query parameter equals `"1"`.
pub fn wants_go_get(uri: &Uri) -> bool {
    let Ok(Query(params)) = Query::<Vec<(String, String)>>::try_from_uri(uri) else {
        return false;
    };
    params
        .iter()
        .find(|(key, _)| key == GO_GET_PARAM)
        .is_some_and(|(_, value)| value == "1")
}
