//! Pure projection from the persisted record to widget view values.
//!
//! No DOM, no clock reads, no mutation: the same record and time always
//! produce the same view. The `dom` module turns a view into patch
//! operations for the page.

use chrono::{DateTime, FixedOffset, Timelike};

use crate::lang::Phrases;
use crate::types::{icon_stem, ForecastMode, MoreInfoMode, TemperatureDisplay, TimeOfDay, WeatherRecord};

const MSN_WEATHER_URL: &str = "https://www.msn.com/en-us/weather/forecast/";
const YAHOO_WEATHER_URL: &str = "https://www.yahoo.com/news/weather/";
const WINDY_URL: &str = "https://www.windy.com/";

/// Everything the widget surface displays, as plain values.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    /// e.g. "Scattered clouds. It is currently 14°"
    pub description: String,
    /// Temperature badge next to the icon, e.g. "14°"
    pub temp_badge: String,
    /// Icon asset path, day/night subfolder included.
    pub icon_path: String,
    /// Forecast sentence; absent when the daily high is unknown.
    pub forecast_line: Option<String>,
    pub forecast_visible: bool,
    /// Target of the "more info" link; absent removes the link.
    pub more_info_url: Option<String>,
}

/// Project a record onto view values. Returns `None` until the first fetch
/// has populated `last_state`.
pub fn render(
    record: &WeatherRecord,
    phrases: &Phrases,
    now: DateTime<FixedOffset>,
) -> Option<WidgetView> {
    let state = record.last_state.as_ref()?;

    let actual = state.temp.floor() as i64;
    let feels = state.feels_like.floor() as i64;

    let temp_text = match record.temperature {
        TemperatureDisplay::FeelsLike => {
            format!("{} {}°", phrases.it_currently_feels_like, feels)
        }
        TemperatureDisplay::Both => format!(
            "{} {}°, {} {}°",
            phrases.it_is_currently, actual, phrases.feels_like, feels
        ),
        TemperatureDisplay::Actual => format!("{} {}°", phrases.it_is_currently, actual),
    };

    let description = format!("{}. {}", capitalize(&state.description), temp_text);

    let time_of_day = TimeOfDay::from_sun(now.timestamp(), state.sunrise, state.sunset);
    let icon_path = format!(
        "src/assets/weather/{}/{}.png",
        time_of_day.as_str(),
        icon_stem(state.condition_code),
    );

    let forecast_line = record.forecast_high.map(|high| {
        let label = if now.hour() > 21 {
            phrases.tomorrow
        } else {
            phrases.today
        };
        // Some locales use one phrase for both days; no label then.
        let day = if label.is_empty() {
            String::new()
        } else {
            format!(" {}", label)
        };
        format!("{} {}°{}.", phrases.with_a_high_of, high, day)
    });

    Some(WidgetView {
        description,
        temp_badge: format!("{}°", actual),
        icon_path,
        forecast_line,
        forecast_visible: forecast_visible(record.forecast, now.hour()),
        more_info_url: more_info_url(record),
    })
}

/// Forecast-line visibility: always / never / morning-and-late-evening.
pub fn forecast_visible(mode: ForecastMode, hour: u32) -> bool {
    match mode {
        ForecastMode::Always => true,
        ForecastMode::Never => false,
        ForecastMode::Auto => hour < 12 || hour > 21,
    }
}

/// Target of the "more info" link, if any.
pub fn more_info_url(record: &WeatherRecord) -> Option<String> {
    match record.more_info {
        MoreInfoMode::None => None,
        MoreInfoMode::Msn => Some(MSN_WEATHER_URL.to_string()),
        MoreInfoMode::Yahoo => Some(YAHOO_WEATHER_URL.to_string()),
        MoreInfoMode::Windy => Some(WINDY_URL.to_string()),
        MoreInfoMode::Custom => record
            .provider_url
            .as_ref()
            .filter(|url| !url.is_empty())
            .cloned(),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ENGLISH;
    use crate::types::ConditionsSnapshot;

    fn fetched_record() -> WeatherRecord {
        WeatherRecord {
            last_call: Some(1_706_788_800),
            last_state: Some(ConditionsSnapshot {
                temp: 14.7,
                feels_like: 12.2,
                temp_max: 16.0,
                sunrise: 1_706_772_000,
                sunset: 1_706_807_000,
                description: "scattered clouds".to_string(),
                condition_code: 802,
            }),
            forecast_high: Some(17),
            ..WeatherRecord::default()
        }
    }

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    // Noon on the snapshot's day, between sunrise and sunset.
    fn noon() -> DateTime<FixedOffset> {
        at("2024-02-01T12:00:00+00:00")
    }

    #[test]
    fn test_no_view_before_first_fetch() {
        let record = WeatherRecord::default();
        assert!(render(&record, &ENGLISH, noon()).is_none());
    }

    #[test]
    fn test_description_is_capitalized_with_actual_temp() {
        let view = render(&fetched_record(), &ENGLISH, noon()).unwrap();
        assert_eq!(view.description, "Scattered clouds. It is currently 14°");
        assert_eq!(view.temp_badge, "14°");
    }

    #[test]
    fn test_description_feels_like_mode() {
        let record = WeatherRecord {
            temperature: TemperatureDisplay::FeelsLike,
            ..fetched_record()
        };
        let view = render(&record, &ENGLISH, noon()).unwrap();
        assert_eq!(
            view.description,
            "Scattered clouds. It currently feels like 12°"
        );
    }

    #[test]
    fn test_description_both_mode() {
        let record = WeatherRecord {
            temperature: TemperatureDisplay::Both,
            ..fetched_record()
        };
        let view = render(&record, &ENGLISH, noon()).unwrap();
        assert_eq!(
            view.description,
            "Scattered clouds. It is currently 14°, feels like 12°"
        );
    }

    #[test]
    fn test_icon_day_and_night() {
        let day = render(&fetched_record(), &ENGLISH, noon()).unwrap();
        assert_eq!(day.icon_path, "src/assets/weather/day/brokenclouds.png");

        let night = render(&fetched_record(), &ENGLISH, at("2024-02-01T23:00:00+00:00")).unwrap();
        assert_eq!(night.icon_path, "src/assets/weather/night/brokenclouds.png");
    }

    #[test]
    fn test_forecast_line_day_label() {
        let view = render(&fetched_record(), &ENGLISH, noon()).unwrap();
        assert_eq!(view.forecast_line.as_deref(), Some("with a high of 17° today."));

        let late = render(&fetched_record(), &ENGLISH, at("2024-02-01T22:30:00+00:00")).unwrap();
        assert_eq!(
            late.forecast_line.as_deref(),
            Some("with a high of 17° tomorrow.")
        );
    }

    #[test]
    fn test_forecast_line_empty_day_label() {
        let phrases = Phrases {
            today: "",
            tomorrow: "",
            ..ENGLISH
        };
        let view = render(&fetched_record(), &phrases, noon()).unwrap();
        assert_eq!(view.forecast_line.as_deref(), Some("with a high of 17°."));
    }

    #[test]
    fn test_forecast_line_absent_when_high_unknown() {
        let record = WeatherRecord {
            forecast_high: None,
            ..fetched_record()
        };
        let view = render(&record, &ENGLISH, noon()).unwrap();
        assert!(view.forecast_line.is_none());
    }

    #[test]
    fn test_forecast_visibility_windows() {
        assert!(forecast_visible(ForecastMode::Always, 15));
        assert!(!forecast_visible(ForecastMode::Never, 8));
        assert!(forecast_visible(ForecastMode::Auto, 8));
        assert!(forecast_visible(ForecastMode::Auto, 23));
        assert!(!forecast_visible(ForecastMode::Auto, 15));
        assert!(!forecast_visible(ForecastMode::Auto, 12));
    }

    #[test]
    fn test_more_info_link_table() {
        let mut record = fetched_record();

        record.more_info = MoreInfoMode::None;
        assert!(more_info_url(&record).is_none());

        record.more_info = MoreInfoMode::Windy;
        record.provider_url = Some("https://example.com/custom".to_string());
        assert_eq!(more_info_url(&record).as_deref(), Some(WINDY_URL));

        record.more_info = MoreInfoMode::Custom;
        assert_eq!(
            more_info_url(&record).as_deref(),
            Some("https://example.com/custom")
        );

        record.provider_url = Some(String::new());
        assert!(more_info_url(&record).is_none());

        record.provider_url = None;
        assert!(more_info_url(&record).is_none());
    }

    #[test]
    fn test_render_is_idempotent_and_does_not_mutate() {
        let record = fetched_record();
        let before = record.clone();

        let first = render(&record, &ENGLISH, noon());
        let second = render(&record, &ENGLISH, noon());

        assert_eq!(first, second);
        assert_eq!(record, before);
    }
}
