//! User-initiated settings events and the per-event record transitions.
//!
//! Each transition returns a new record value; nothing here touches the
//! store or the network. The service layer owns validation that needs
//! collaborators (connectivity, geolocation) plus persistence.

use crate::provider::Observation;
use crate::types::{
    Coordinates, ForecastMode, MoreInfoMode, TemperatureDisplay, Unit, WeatherRecord, MAX_CITY_LEN,
};

/// Minimum accepted length of a user-entered city, in characters.
pub const MIN_CITY_LEN: usize = 3;

/// One settings-panel event. Variants map one-to-one onto the widget's
/// event tags (units / city / geol / forecast / temp / moreinfo / provider /
/// unhide).
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEvent {
    Units { imperial: bool },
    City { city: String, country_code: String },
    Geolocation { enabled: bool },
    Forecast(Option<ForecastMode>),
    Temperature(Option<TemperatureDisplay>),
    MoreInfo(Option<MoreInfoMode>),
    Provider(String),
    Unhide,
}

/// Whether a city input is long enough to be submitted.
pub fn valid_city_input(city: &str) -> bool {
    city.chars().count() >= MIN_CITY_LEN
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

pub fn set_unit(record: &WeatherRecord, imperial: bool) -> WeatherRecord {
    WeatherRecord {
        unit: if imperial { Unit::Imperial } else { Unit::Metric },
        ..record.clone()
    }
}

pub fn set_city(record: &WeatherRecord, city: &str, country_code: &str) -> WeatherRecord {
    WeatherRecord {
        city: truncate_chars(city, MAX_CITY_LEN),
        country_code: country_code.to_string(),
        ..record.clone()
    }
}

pub fn set_location(record: &WeatherRecord, location: Option<Coordinates>) -> WeatherRecord {
    WeatherRecord {
        location,
        ..record.clone()
    }
}

pub fn set_forecast_mode(record: &WeatherRecord, mode: Option<ForecastMode>) -> WeatherRecord {
    WeatherRecord {
        forecast: mode.unwrap_or_default(),
        ..record.clone()
    }
}

pub fn set_temperature_display(
    record: &WeatherRecord,
    display: Option<TemperatureDisplay>,
) -> WeatherRecord {
    WeatherRecord {
        temperature: display.unwrap_or_default(),
        ..record.clone()
    }
}

pub fn set_more_info(record: &WeatherRecord, mode: Option<MoreInfoMode>) -> WeatherRecord {
    WeatherRecord {
        more_info: mode.unwrap_or_default(),
        ..record.clone()
    }
}

pub fn set_provider_url(record: &WeatherRecord, url: &str) -> WeatherRecord {
    WeatherRecord {
        provider_url: Some(url.to_string()),
        ..record.clone()
    }
}

/// Fold a successful fetch into the record: snapshot, forecast high and the
/// call timestamp move together, nothing else changes.
pub fn apply_observation(
    record: &WeatherRecord,
    observation: Observation,
    now_secs: i64,
) -> WeatherRecord {
    WeatherRecord {
        last_call: Some(now_secs),
        last_state: Some(observation.state),
        forecast_high: observation.forecast_high,
        ..record.clone()
    }
}
