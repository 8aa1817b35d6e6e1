// Outbound provider client
// One shared reqwest client for the geolocation and reverse-geocode endpoints

use std::net::Ipv4Addr;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::LookupError;
use super::types::{AddressDetail, Envelope, GeoCoordinate, IpLocation};
use crate::config::ProvidersConfig;

/// HTTP client bound to the two configured provider URL templates
///
/// Requests are never retried; timeouts come from configuration. Transport
/// errors are stripped of their URL, which embeds the queried address.
pub struct ProviderClient {
    client: reqwest::Client,
    geo_url: String,
    detail_url: String,
}

impl ProviderClient {
    pub fn new(cfg: &ProvidersConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(cfg.connect_timeout))
            .timeout(Duration::from_secs(cfg.request_timeout))
            .user_agent(cfg.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            geo_url: cfg.geo_url.clone(),
            detail_url: cfg.detail_url.clone(),
        })
    }

    /// Query the geolocation provider
    ///
    /// Returns `MissingData` when the provider answers without a `data` object.
    pub async fn locate(&self, addr: Ipv4Addr) -> Result<IpLocation, LookupError> {
        let url = self.geo_url.replace("{ip}", &addr.to_string());
        debug!(%url, "requesting IP location");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, ip = %addr, "geolocation provider returned an error status");
            return Err(LookupError::GeoStatus(status));
        }

        let body: Envelope<IpLocation> =
            response.json().await.map_err(reqwest::Error::without_url)?;
        body.data.ok_or(LookupError::MissingData)
    }

    /// Query the reverse-geocode provider for the address at `at`
    ///
    /// A missing `data` object is not an error; the detail simply stays empty.
    pub async fn reverse_geocode(&self, at: GeoCoordinate) -> Result<AddressDetail, LookupError> {
        let url = self
            .detail_url
            .replace("{lat}", &at.lat.to_string())
            .replace("{lng}", &at.lng.to_string());
        debug!(%url, "requesting address detail");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, lat = at.lat, lng = at.lng, "reverse-geocode provider returned an error status");
            return Err(LookupError::DetailStatus(status));
        }

        let body: Envelope<AddressDetail> =
            response.json().await.map_err(reqwest::Error::without_url)?;
        Ok(body.data.unwrap_or_default())
    }
}
