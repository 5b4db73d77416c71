//! Response building.
//!
//! # Responsibilities
//! - Render the `go-import` / `go-source` metadata page
//! - Build the 307 redirect to the repository
//! - Map render failures to 500 Internal Server Error
//!
//! # Design Decisions
//! - Rendering is a pure function of `ResolvedVars`, testable byte for byte
//! - Interpolated values are HTML-escaped

use std::fmt::{self, Write};

use axum::http::header::{InvalidHeaderValue, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::observability::metrics::{self, Outcome};
use crate::routing::ResolvedVars;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to format metadata page")]
    Format(#[from] fmt::Error),

    #[error("resolved uri is not a valid Location header: {0}")]
    Location(#[from] InvalidHeaderValue),
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Failed to render response");
        metrics::record_request(Outcome::Error);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Render the page `go get` reads import metadata from.
pub fn render_meta(vars: &ResolvedVars) -> Result<String, RenderError> {
    let host = escape(&vars.host);
    let path = escape(&vars.path);
    let vcs = escape(&vars.vcs);
    let uri = escape(&vars.uri);

    let mut out = String::with_capacity(512);
    writeln!(out, "<html>")?;
    writeln!(out, "<head>")?;
    writeln!(out, r#"<meta name="go-import" content="{host}{path} {vcs} {uri}">"#)?;
    writeln!(
        out,
        r#"<meta name="go-source" content="{host}{path} {uri} {uri}/tree/master{{/dir}} {uri}/blob/master{{/dir}}/{{file}}#L{{line}}" />"#
    )?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "go get {host}{path}")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}

/// `200 OK` metadata page.
pub fn meta_response(vars: &ResolvedVars) -> Result<Response, RenderError> {
    let body = render_meta(vars)?;
    Ok((StatusCode::OK, Html(body)).into_response())
}

/// `307 Temporary Redirect` to the resolved repository URI.
pub fn redirect_response(vars: &ResolvedVars) -> Result<Response, RenderError> {
    let location = HeaderValue::from_str(&vars.uri)?;
    Ok((StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]).into_response())
}

/// Text escaping with the same replacements as Go's `html/template`.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            '+' => out.push_str("&#43;"),
            '\0' => out.push('\u{FFFD}'),
            _ => out.push(c),
        }
    }
    out
}
