// Configuration module entry point
// Manages application configuration, validation and shared request state

mod state;
mod types;
mod validation;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, ProvidersConfig};
pub use validation::ConfigError;

pub const DEFAULT_GEO_URL: &str =
    "https://apimobile.meituan.com/locate/v2/ip/loc?rgeo=true&ip={ip}";
pub const DEFAULT_DETAIL_URL: &str =
    "https://apimobile.meituan.com/group/v1/city/latlng/{lat},{lng}?tag=0";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("IPTRACE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from an inline TOML document layered over the defaults
    #[cfg(test)]
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_grace", 5)?
            .set_default("http.server_name", "iptrace")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 65_536)?
            .set_default("providers.geo_url", DEFAULT_GEO_URL)?
            .set_default("providers.detail_url", DEFAULT_DETAIL_URL)?
            .set_default("providers.connect_timeout", 5)?
            .set_default("providers.request_timeout", 10)?
            .set_default(
                "providers.user_agent",
                concat!("iptrace/", env!("CARGO_PKG_VERSION")),
            )
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
