// Application state module
// Shared, read-only state handed to every request

use super::types::Config;
use crate::geo::GeoLocator;

/// Application state
pub struct AppState {
    pub config: Config,
    pub locator: GeoLocator,
}

impl AppState {
    /// Build state from a validated configuration
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let locator = GeoLocator::new(&config.providers)?;
        Ok(Self { config, locator })
    }
}
