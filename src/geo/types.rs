// Geolocation data types
// Provider wire formats and the normalized result returned to clients

use serde::{Deserialize, Serialize};

/// Common `{"data": ...}` envelope used by both providers
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub data: Option<T>,
}

/// Geolocation provider payload
#[derive(Debug, Default, Deserialize)]
pub struct IpLocation {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub rgeo: Option<RegionHint>,
}

impl IpLocation {
    /// Both coordinates, or `None` if either is absent
    pub const fn coordinate(&self) -> Option<GeoCoordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoCoordinate { lat, lng }),
            _ => None,
        }
    }
}

/// Coarse administrative hint attached to an IP location
#[derive(Debug, Default, Deserialize)]
pub struct RegionHint {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

/// Reverse-geocode provider payload
#[derive(Debug, Default, Deserialize)]
pub struct AddressDetail {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Normalized location; absent text fields are empty strings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationResult {
    pub country: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail: String,
    pub lat: f64,
    pub lng: f64,
}

impl LocationResult {
    pub fn assemble(hint: Option<RegionHint>, detail: Option<String>, at: GeoCoordinate) -> Self {
        let hint = hint.unwrap_or_default();
        Self {
            country: hint.country.unwrap_or_default(),
            province: hint.province.unwrap_or_default(),
            city: hint.city.unwrap_or_default(),
            district: hint.district.unwrap_or_default(),
            detail: detail.unwrap_or_default(),
            lat: at.lat,
            lng: at.lng,
        }
    }
}

/// Successful `/api/query` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub ip: String,
    pub location: LocationResult,
}

/// Error body shared by every failing API response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_payload_tolerates_missing_fields() {
        let env: Envelope<IpLocation> =
            serde_json::from_str(r#"{"data":{"lat":39.9,"rgeo":{"country":null}}}"#).unwrap();
        let data = env.data.unwrap();
        assert_eq!(data.lat, Some(39.9));
        assert!(data.coordinate().is_none());
        assert!(data.rgeo.unwrap().country.is_none());

        let env: Envelope<IpLocation> = serde_json::from_str(r#"{"code":1}"#).unwrap();
        assert!(env.data.is_none());
        let env: Envelope<IpLocation> = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(env.data.is_none());
    }

    #[test]
    fn test_assemble_defaults_to_empty_strings() {
        let loc = LocationResult::assemble(
            None,
            None,
            GeoCoordinate {
                lat: 1.5,
                lng: -2.25,
            },
        );
        assert_eq!(loc.country, "");
        assert_eq!(loc.detail, "");
        assert_eq!(
            serde_json::to_value(&loc).unwrap(),
            serde_json::json!({
                "country": "", "province": "", "city": "", "district": "",
                "detail": "", "lat": 1.5, "lng": -2.25
            })
        );
    }
}
