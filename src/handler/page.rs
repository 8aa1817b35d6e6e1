// Bundled lookup page

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::HttpConfig;
use crate::http;

/// Single-page UI compiled into the binary
pub const INDEX_HTML: &str = include_str!("index.html");

/// Serve the lookup page
pub fn serve_page(is_head: bool, http_config: &HttpConfig) -> Response<Full<Bytes>> {
    http::build_html_response(INDEX_HTML, is_head, http_config)
}
