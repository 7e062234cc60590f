//! Location sources for the widget: a system geolocation seam and the
//! IP-based lookup used as fallback and for the display city name.

use serde::Deserialize;
use std::time::Duration;

use crate::error::GeolocationError;
use crate::types::Coordinates;

const IPAPI_URL: &str = "https://ipapi.co";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// System geolocation collaborator. Grant yields coordinates; denial and
/// absence are distinct errors so the caller can converge the UI.
pub trait Geolocator {
    fn position(
        &self,
    ) -> impl std::future::Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

/// Platform geolocation. No location service is wired up on this target yet,
/// which sends callers down the IP-lookup fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocator;

impl Geolocator for SystemLocator {
    async fn position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::ServiceUnavailable)
    }
}

/// Result of an IP-based geolocation lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub city: String,
    pub country: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    error: bool,
    city: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// IP-geolocation client (ipapi.co).
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    base_url: String,
}

impl IpLocator {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: IPAPI_URL.to_string(),
        })
    }

    #[cfg(test)]
    pub fn new_with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Best-effort lookup. Returns `None` on any failure; the caller falls
    /// back to the fixed default city/country.
    pub async fn lookup(&self) -> Option<IpLocation> {
        let url = format!("{}/json", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("IP geolocation request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("IP geolocation returned status {}", response.status());
            return None;
        }

        let body: IpApiResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("IP geolocation parse error: {}", e);
                return None;
            }
        };

        if body.error {
            return None;
        }

        let location = IpLocation {
            city: body.city?,
            country: body.country?,
            coordinates: Coordinates {
                latitude: body.latitude?,
                longitude: body.longitude?,
            },
        };

        tracing::info!("IP geolocated to: {}, {}", location.city, location.country);
        Some(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_system_locator_is_unavailable() {
        let result = SystemLocator.position().await;
        assert!(matches!(result, Err(GeolocationError::ServiceUnavailable)));
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": "Paris",
                "country": "FR",
                "latitude": 48.8566,
                "longitude": 2.3522
            })))
            .mount(&mock_server)
            .await;

        let locator = IpLocator::new_with_base_url(&mock_server.uri());
        let location = locator.lookup().await.unwrap();

        assert_eq!(location.city, "Paris");
        assert_eq!(location.country, "FR");
        assert_eq!(location.coordinates.latitude, 48.8566);
    }

    #[tokio::test]
    async fn test_lookup_error_flag_yields_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": true,
                "reason": "RateLimited"
            })))
            .mount(&mock_server)
            .await;

        let locator = IpLocator::new_with_base_url(&mock_server.uri());
        assert!(locator.lookup().await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_server_error_yields_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let locator = IpLocator::new_with_base_url(&mock_server.uri());
        assert!(locator.lookup().await.is_none());
    }
}
