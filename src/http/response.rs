//! HTTP response building module
//!
//! Provides builders for the responses the router produces, decoupled from lookup logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;

/// Build JSON response
pub fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    http: &HttpConfig,
) -> Response<Full<Bytes>> {
    let (status, json) = match serde_json::to_vec(body) {
        Ok(j) => (status, j),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"error":"internal server error"}"#.to_vec(),
            )
        }
    };

    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Server", &http.server_name);

    if http.enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder.body(Full::new(Bytes::from(json))).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build HTML page response
pub fn build_html_response(
    content: &'static str,
    is_head: bool,
    http: &HttpConfig,
) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(content.as_bytes())
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content.len())
        .header("Cache-Control", "no-cache")
        .header("Server", &http.server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    build_json_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        &serde_json::json!({ "error": "request body too large" }),
        http,
    )
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
