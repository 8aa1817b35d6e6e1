//! Geolocation module
//!
//! Turns a client-supplied IPv4 string into a normalized location by
//! chaining the geolocation and reverse-geocode providers.

pub mod address;
mod error;
mod orchestrator;
mod provider;
pub mod types;

pub use error::LookupError;
pub use orchestrator::GeoLocator;
pub use types::ErrorBody;
