// Geolocation orchestrator
// Validate, screen reserved ranges, then chain the two provider calls

use tracing::debug;

use super::address::{parse_ipv4, reserved_range};
use super::error::LookupError;
use super::provider::ProviderClient;
use super::types::{LocationResult, QueryResult};
use crate::config::ProvidersConfig;

pub struct GeoLocator {
    providers: ProviderClient,
}

impl GeoLocator {
    pub fn new(cfg: &ProvidersConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            providers: ProviderClient::new(cfg)?,
        })
    }

    /// Resolve a client-supplied IP string into a normalized location
    ///
    /// Each step is a hard gate: syntax, reserved ranges, IP location, then
    /// address detail. The detail lookup needs the coordinates produced by
    /// the first call, so the two requests are strictly sequential.
    pub async fn resolve(&self, candidate: &str) -> Result<QueryResult, LookupError> {
        let addr = parse_ipv4(candidate).ok_or(LookupError::InvalidFormat)?;

        if let Some(range) = reserved_range(addr) {
            debug!(ip = %addr, range = range.name, "rejecting reserved address");
            return Err(LookupError::Reserved);
        }

        let located = self.providers.locate(addr).await?;
        let at = located.coordinate().ok_or(LookupError::MissingCoordinates)?;

        let detail = self.providers.reverse_geocode(at).await?;

        Ok(QueryResult {
            ip: addr.to_string(),
            location: LocationResult::assemble(located.rgeo, detail.detail, at),
        })
    }
}
