//! Request handler module
//!
//! Responsible for request routing dispatch: the lookup API, the client
//! address echo, and the bundled lookup page.

pub mod client_ip;
pub mod page;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
