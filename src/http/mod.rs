//! HTTP protocol layer module
//!
//! Response builders shared by the router, decoupled from lookup logic.

pub mod response;

// Re-export commonly used builders
pub use response::{build_413_response, build_html_response, build_json_response};
