//! OpenWeatherMap client: current conditions plus the multi-point forecast,
//! merged into one observation for the widget record.

use base64::prelude::{Engine, BASE64_STANDARD};
use chrono::{DateTime, FixedOffset, Timelike};
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;

use crate::error::WeatherError;
use crate::lang::api_lang;
use crate::types::{ConditionsSnapshot, WeatherRecord};

const OWM_BASE: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// A successful current+forecast call pair, ready to be folded into the
/// persisted record.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub state: ConditionsSnapshot,
    pub forecast_high: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    main: CurrentMain,
    sys: CurrentSys,
    weather: Vec<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    feels_like: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    description: String,
    id: u16,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: ForecastMain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastMain {
    pub temp_max: f64,
}

enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
        }
    }
}

/// Weather API client with a pool of base64-encoded API keys; one key is
/// picked at random per request.
#[derive(Debug, Clone)]
pub struct OwmClient {
    client: reqwest::Client,
    base_url: String,
    api_keys: Vec<String>,
}

impl OwmClient {
    pub fn new(api_keys: Vec<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: OWM_BASE.to_string(),
            api_keys,
        })
    }

    #[cfg(test)]
    pub fn new_with_base_url(base_url: &str, api_keys: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_keys,
        }
    }

    fn pick_key(&self) -> Result<String, WeatherError> {
        if self.api_keys.is_empty() {
            return Err(WeatherError::NoApiKey);
        }
        let index = rand::rng().random_range(0..self.api_keys.len());
        let decoded = BASE64_STANDARD
            .decode(&self.api_keys[index])
            .map_err(|_| WeatherError::InvalidApiKey)?;
        String::from_utf8(decoded).map_err(|_| WeatherError::InvalidApiKey)
    }

    fn request_url(
        &self,
        record: &WeatherRecord,
        lang: &str,
        endpoint: Endpoint,
        key: &str,
    ) -> String {
        let mut url = format!(
            "{}/{}?units={}&lang={}",
            self.base_url,
            endpoint.path(),
            record.unit.as_query(),
            api_lang(lang),
        );

        // Coordinates take precedence over the manual city/country pair.
        match record.location {
            Some(coords) => {
                url.push_str(&format!("&lat={}&lon={}", coords.latitude, coords.longitude));
            }
            None => {
                url.push_str(&format!(
                    "&q={},{}",
                    urlencoding::encode(&record.city),
                    record.country_code,
                ));
            }
        }

        url.push_str(&format!("&appid={}", key));
        url
    }

    /// Issue the current + forecast request pair.
    ///
    /// Errors on any transport failure or non-success status on either
    /// response; the caller keeps its cached record in that case, with no
    /// partial merge.
    pub async fn fetch(
        &self,
        record: &WeatherRecord,
        lang: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<Observation, WeatherError> {
        let current_url = self.request_url(record, lang, Endpoint::Current, &self.pick_key()?);
        let forecast_url = self.request_url(record, lang, Endpoint::Forecast, &self.pick_key()?);

        let current = self.client.get(&current_url).send().await?;
        let forecast = self.client.get(&forecast_url).send().await?;

        for response in [&current, &forecast] {
            if !response.status().is_success() {
                return Err(WeatherError::Status(response.status()));
            }
        }

        let current: CurrentResponse = current
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;
        let forecast: ForecastResponse = forecast
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let conditions = current
            .weather
            .first()
            .ok_or_else(|| WeatherError::Parse("empty weather array".to_string()))?;

        let state = ConditionsSnapshot {
            temp: current.main.temp,
            feels_like: current.main.feels_like,
            temp_max: current.main.temp_max,
            sunrise: current.sys.sunrise,
            sunset: current.sys.sunset,
            description: conditions.description.clone(),
            condition_code: conditions.id,
        };

        Ok(Observation {
            state,
            forecast_high: forecast_high(&forecast.list, now),
        })
    }
}

/// Maximum `temp_max` among forecast entries falling on the target calendar
/// day: tomorrow when the local hour is past 18, today otherwise.
///
/// Returns `None` when no entry matches the target day, so an unknown high
/// never shows up as a bogus temperature.
pub fn forecast_high(entries: &[ForecastEntry], now: DateTime<FixedOffset>) -> Option<i32> {
    let today = now.date_naive();
    let target = if now.hour() > 18 {
        today.succ_opt()?
    } else {
        today
    };

    let offset = *now.offset();
    let mut max: Option<f64> = None;

    for entry in entries {
        let Some(dt) = DateTime::from_timestamp(entry.dt, 0) else {
            continue;
        };
        if dt.with_timezone(&offset).date_naive() == target {
            max = Some(max.map_or(entry.main.temp_max, |m: f64| m.max(entry.main.temp_max)));
        }
    }

    max.map(|m| m.round() as i32)
}
