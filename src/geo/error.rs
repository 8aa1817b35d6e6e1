// Lookup error taxonomy
// Every failure maps to exactly one HTTP status and one client-facing message

use hyper::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("invalid IP address format")]
    InvalidFormat,

    #[error("reserved/private address not supported")]
    Reserved,

    #[error("geolocation provider request failed: {0}")]
    GeoStatus(reqwest::StatusCode),

    #[error("unable to obtain IP location data")]
    MissingData,

    #[error("unable to obtain coordinates")]
    MissingCoordinates,

    #[error("detail address request failed: {0}")]
    DetailStatus(reqwest::StatusCode),

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    #[error("{0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("{0}")]
    BodyRead(String),

    #[error("lookup timed out after {0} seconds")]
    Timeout(u64),
}

impl LookupError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidFormat | Self::Reserved => StatusCode::BAD_REQUEST,
            Self::GeoStatus(_)
            | Self::MissingData
            | Self::MissingCoordinates
            | Self::DetailStatus(_) => StatusCode::BAD_GATEWAY,
            Self::Upstream(_) | Self::InvalidBody(_) | Self::BodyRead(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}
