// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub providers: ProvidersConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. "info" or "iptrace=debug,warn"
    pub level: String,
    /// Output format for diagnostic events (text or json)
    pub format: String,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub file: Option<String>,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    pub access_log_format: String,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Seconds allowed to receive request headers, idle keep-alive included
    pub read_timeout: u64,
    /// Seconds allowed to produce one response
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    /// Seconds granted to in-flight connections after a shutdown signal
    pub shutdown_grace: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Upstream provider configuration
///
/// `geo_url` must contain `{ip}`; `detail_url` must contain `{lat}` and `{lng}`.
#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    pub geo_url: String,
    pub detail_url: String,
    /// Connect timeout in seconds
    pub connect_timeout: u64,
    /// Whole-request timeout in seconds
    pub request_timeout: u64,
    pub user_agent: String,
}
