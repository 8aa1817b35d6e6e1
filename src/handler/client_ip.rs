//! Client address echo
//!
//! The service sits behind an edge proxy, so the caller's address comes from
//! forwarding headers rather than the TCP peer.

use hyper::HeaderMap;

/// Header set by the edge proxy to the connecting client's address
pub const CONNECTING_IP_HEADER: &str = "cf-connecting-ip";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Returned when neither header is present
pub const UNKNOWN_IP: &str = "unknown";

/// Resolve the caller's address from request headers
///
/// Prefers the connecting-IP header, then the first hop of
/// `X-Forwarded-For`. Empty or non-ASCII values are ignored.
pub fn client_ip(headers: &HeaderMap) -> String {
    header_value(headers, CONNECTING_IP_HEADER)
        .or_else(|| {
            header_value(headers, FORWARDED_FOR_HEADER)
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .unwrap_or(UNKNOWN_IP)
        .to_string()
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
