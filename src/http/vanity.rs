//! The vanity import middleware.
//!
//! Sits in front of the rest of the handler chain. A matched request is
//! answered here; anything else runs the next handler untouched.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::config::FallbackConfig;
use crate::http::request::{request_host, request_path, wants_go_get};
use crate::http::response::{meta_response, redirect_response};
use crate::observability::metrics::{self, Outcome};
use crate::routing::RouteTable;

/// Resolve the request against the published matchers.
pub async fn vanity_layer(
    State(table): State<Arc<RouteTable>>,
    request: Request,
    next: Next,
) -> Response {
    let host = request_host(&request);
    let path = request_path(request.uri());

    let vars = match table.resolve(&host, &path) {
        Ok(vars) => vars,
        Err(no_match) => {
            tracing::debug!(host = %host, error = %no_match, "Passing request to next handler");
            metrics::record_request(Outcome::Pass);
            return next.run(request).await;
        }
    };

    let result = if wants_go_get(request.uri()) {
        tracing::debug!(
            import_path = %vars.import_path(),
            vcs = %vars.vcs,
            uri = %vars.uri,
            "Serving import metadata"
        );
        meta_response(&vars).inspect(|_| metrics::record_request(Outcome::Meta))
    } else {
        tracing::debug!(path = %path, uri = %vars.uri, "Redirecting to repository");
        redirect_response(&vars).inspect(|_| metrics::record_request(Outcome::Redirect))
    };

    result.unwrap_or_else(IntoResponse::into_response)
}

/// Terminal handler for requests no entry claimed.
async fn fallback_handler(State(fallback): State<FallbackConfig>) -> Response {
    let status = StatusCode::from_u16(fallback.status).unwrap_or(StatusCode::NOT_FOUND);
    (status, Body::from(fallback.body)).into_response()
}

/// Router with the vanity layer in front of the fallback handler.
///
/// Embedders can `merge` or `nest` this, or put `vanity_layer` in front of
/// their own routes with `axum::middleware::from_fn_with_state`.
pub fn router(table: Arc<RouteTable>, fallback: FallbackConfig) -> Router {
    Router::new()
        .fallback(fallback_handler)
        .with_state(fallback)
        .layer(middleware::from_fn_with_state(table, vanity_layer))
}
