//! Weather-specific error types.
//!
//! Every fetch-path failure degrades to "keep the cached record"; these
//! types exist so the service layer can log precisely while the widget
//! stays silent.

use thiserror::Error;

/// Errors from the weather provider and its surroundings.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network reported offline")]
    Offline,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather API returned {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed weather response: {0}")]
    Parse(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("API key entry is not valid base64")]
    InvalidApiKey,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),
}

impl WeatherError {
    /// Whether the cached record should simply be kept, with no user-visible
    /// error. True for every fetch-path failure.
    pub fn keeps_cache(&self) -> bool {
        !matches!(self, WeatherError::Store(_))
    }
}

/// Geolocation service errors.
#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
}

/// Persisted store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failures_keep_cache() {
        assert!(WeatherError::Offline.keeps_cache());
        assert!(WeatherError::NoApiKey.keeps_cache());
        assert!(WeatherError::Status(reqwest::StatusCode::UNAUTHORIZED).keeps_cache());
        assert!(WeatherError::Geolocation(GeolocationError::PermissionDenied).keeps_cache());
    }

    #[test]
    fn test_store_failure_does_not_keep_cache() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!WeatherError::Store(StoreError::Io(io)).keeps_cache());
    }
}
