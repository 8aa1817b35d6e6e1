//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: classifies the request into a
//! route, dispatches it, and writes the access log line.

use crate::config::{AppState, HttpConfig};
use crate::geo::{ErrorBody, LookupError};
use crate::handler::{client_ip, page};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode, Version};
use serde::Deserialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Every request maps to exactly one of these
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `POST /api/query`
    Query,
    /// `/api/clientip`, any method
    ClientIp,
    /// Anything else serves the lookup page
    Page,
}

impl Route {
    pub fn classify(method: &Method, path: &str) -> Self {
        match (method, path) {
            (&Method::POST, "/api/query") => Self::Query,
            (_, "/api/clientip") => Self::ClientIp,
            _ => Self::Page,
        }
    }
}

/// `/api/query` request body
#[derive(Debug, Deserialize)]
struct QueryRequest {
    #[serde(default)]
    ip: serde_json::Value,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let route = Route::classify(req.method(), req.uri().path());
    let http_config = &state.config.http;

    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, peer_addr));

    let response = match route {
        Route::Page => page::serve_page(req.method() == Method::HEAD, http_config),
        Route::ClientIp => {
            let ip = client_ip::client_ip(req.headers());
            http::build_json_response(StatusCode::OK, &serde_json::json!({ "ip": ip }), http_config)
        }
        Route::Query => {
            let budget = state.config.performance.write_timeout;
            match tokio::time::timeout(Duration::from_secs(budget), handle_query(req, &state)).await
            {
                Ok(resp) => resp,
                Err(_) => error_response(&LookupError::Timeout(budget), http_config),
            }
        }
    };

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Read the body, run the lookup, and render either the result or the error
async fn handle_query<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let http_config = &state.config.http;

    if let Some(resp) = check_body_size(&req, http_config) {
        return resp;
    }

    let limit = usize::try_from(http_config.max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_warning(&format!("Request body exceeded {limit} bytes"));
            return http::build_413_response(http_config);
        }
        Err(e) => return error_response(&LookupError::BodyRead(e.to_string()), http_config),
    };

    let outcome = match serde_json::from_slice::<QueryRequest>(&bytes) {
        Ok(query) => {
            let candidate = query.ip.as_str().unwrap_or_default();
            state.locator.resolve(candidate).await
        }
        Err(e) => Err(LookupError::from(e)),
    };

    match outcome {
        Ok(result) => http::build_json_response(StatusCode::OK, &result, http_config),
        Err(e) => error_response(&e, http_config),
    }
}

fn error_response(err: &LookupError, http_config: &HttpConfig) -> Response<Full<Bytes>> {
    let status = err.status();
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %err, "lookup failed");
    } else {
        tracing::warn!(status = status.as_u16(), error = %err, "lookup rejected");
    }

    let body = ErrorBody {
        error: err.to_string(),
    };
    http::build_json_response(status, &body, http_config)
}

/// Reject early when the declared Content-Length is over the limit
fn check_body_size<B>(req: &Request<B>, http_config: &HttpConfig) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let max_body_size = http_config.max_body_size;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response(http_config))
            }
            _ => None,
        },
    )
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}
