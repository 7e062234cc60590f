use serde::{Deserialize, Serialize};

/// Maximum stored length of a user-entered city name, in characters.
pub const MAX_CITY_LEN: usize = 64;

/// City/country used when every location source fails.
pub const FALLBACK_CITY: &str = "Paris";
pub const FALLBACK_COUNTRY: &str = "FR";

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    /// Query-parameter value for the weather API.
    pub fn as_query(&self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }
}

/// When the forecast line is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Which temperature phrase the description line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureDisplay {
    #[default]
    Actual,
    FeelsLike,
    Both,
}

/// Provider for the external "more details" link.
///
/// Serialized names match the legacy persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MoreInfoMode {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "msnw")]
    Msn,
    #[serde(rename = "yhw")]
    Yahoo,
    #[serde(rename = "windy")]
    Windy,
    #[serde(rename = "custom")]
    Custom,
}

/// Geographic coordinates, persisted as a `[latitude, longitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Snapshot of the last successful current-conditions call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionsSnapshot {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_max: f64,
    /// Sunrise/sunset as seconds since epoch, as reported by the API.
    pub sunrise: i64,
    pub sunset: i64,
    pub description: String,
    #[serde(rename = "icon_id")]
    pub condition_code: u16,
}

/// The persisted settings-and-cache record for the widget.
///
/// Field names mirror the legacy persisted document so an existing store
/// file keeps working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    #[serde(default)]
    pub unit: Unit,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(rename = "ccode", default = "default_country")]
    pub country_code: String,
    /// Present iff geolocation mode is active; takes precedence over
    /// city/country for request construction.
    #[serde(default, with = "location_pair")]
    pub location: Option<Coordinates>,
    /// Seconds since epoch of the last successful fetch; absent on first run.
    #[serde(rename = "lastCall", default, skip_serializing_if = "Option::is_none")]
    pub last_call: Option<i64>,
    #[serde(rename = "lastState", default, skip_serializing_if = "Option::is_none")]
    pub last_state: Option<ConditionsSnapshot>,
    /// Rounded daily maximum for the target forecast day. `None` when no
    /// forecast entry fell on that day.
    #[serde(rename = "fcHigh", default, skip_serializing_if = "Option::is_none")]
    pub forecast_high: Option<i32>,
    #[serde(default)]
    pub forecast: ForecastMode,
    #[serde(default)]
    pub temperature: TemperatureDisplay,
    #[serde(rename = "moreinfo", default)]
    pub more_info: MoreInfoMode,
    #[serde(rename = "provider", default, skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,
}

fn default_city() -> String {
    FALLBACK_CITY.to_string()
}

fn default_country() -> String {
    FALLBACK_COUNTRY.to_string()
}

impl Default for WeatherRecord {
    fn default() -> Self {
        Self {
            unit: Unit::default(),
            city: default_city(),
            country_code: default_country(),
            location: None,
            last_call: None,
            last_state: None,
            forecast_high: None,
            forecast: ForecastMode::default(),
            temperature: TemperatureDisplay::default(),
            more_info: MoreInfoMode::default(),
            provider_url: None,
        }
    }
}

impl WeatherRecord {
    /// True until the first successful fetch has been persisted.
    pub fn is_first_run(&self) -> bool {
        self.last_call.is_none()
    }

    /// Whether geolocation mode is active.
    pub fn is_geolocated(&self) -> bool {
        self.location.is_some()
    }
}

/// Legacy store files hold a cleared location as an empty array, so accept
/// missing, `null`, `[]` and `[lat, lon]` on read; write `null` when absent.
mod location_pair {
    use super::Coordinates;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Coordinates>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(c) => [c.latitude, c.longitude].serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Coordinates>, D::Error> {
        let raw: Option<Vec<f64>> = Option::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some([latitude, longitude]) => Some(Coordinates {
                latitude: *latitude,
                longitude: *longitude,
            }),
            _ => None,
        })
    }
}

/// Widget visibility flags persisted alongside the record. When both are set
/// the widget is fully disabled and no fetch occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HideFlags {
    #[serde(rename = "weatherdesc", default)]
    pub weather_description: bool,
    #[serde(rename = "weathericon", default)]
    pub weather_icon: bool,
}

impl HideFlags {
    /// Both flags set: skip rendering and fetching entirely.
    pub fn widget_disabled(&self) -> bool {
        self.weather_description && self.weather_icon
    }
}

/// Map an OpenWeatherMap condition code to an icon filename stem.
/// Unknown codes fall back to `lightrain`.
pub fn icon_stem(code: u16) -> &'static str {
    match code {
        200..=202 | 210..=212 | 221 | 230..=232 => "thunderstorm",
        300..=302 | 310 => "lightdrizzle",
        312..=314 | 321 => "showerdrizzle",
        500..=503 => "lightrain",
        504 | 520..=522 => "showerrain",
        511 | 600..=602 | 611..=613 | 615 | 616 | 620..=622 => "snow",
        701 | 711 | 721 | 731 | 741 | 751 | 761 | 762 | 771 | 781 => "mist",
        800 => "clearsky",
        801 => "fewclouds",
        802 => "brokenclouds",
        803 | 804 => "overcastclouds",
        _ => "lightrain",
    }
}

/// Day/night icon subfolder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    /// Night outside the sunrise..sunset window, day inside it.
    pub fn from_sun(now_secs: i64, sunrise: i64, sunset: i64) -> Self {
        if now_secs < sunrise || now_secs > sunset {
            TimeOfDay::Night
        } else {
            TimeOfDay::Day
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "day",
            TimeOfDay::Night => "night",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_stem_clear_sky() {
        assert_eq!(icon_stem(800), "clearsky");
    }

    #[test]
    fn test_icon_stem_light_drizzle() {
        assert_eq!(icon_stem(300), "lightdrizzle");
        assert_eq!(icon_stem(310), "lightdrizzle");
    }

    #[test]
    fn test_icon_stem_shower_drizzle() {
        assert_eq!(icon_stem(312), "showerdrizzle");
        assert_eq!(icon_stem(321), "showerdrizzle");
    }

    #[test]
    fn test_icon_stem_snow_includes_freezing_rain() {
        assert_eq!(icon_stem(511), "snow");
        assert_eq!(icon_stem(622), "snow");
    }

    #[test]
    fn test_icon_stem_clouds() {
        assert_eq!(icon_stem(801), "fewclouds");
        assert_eq!(icon_stem(802), "brokenclouds");
        assert_eq!(icon_stem(803), "overcastclouds");
        assert_eq!(icon_stem(804), "overcastclouds");
    }

    #[test]
    fn test_icon_stem_unknown_defaults_to_light_rain() {
        assert_eq!(icon_stem(999), "lightrain");
        assert_eq!(icon_stem(0), "lightrain");
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(TimeOfDay::from_sun(500, 400, 1000), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_sun(300, 400, 1000), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_sun(1100, 400, 1000), TimeOfDay::Night);
    }

    #[test]
    fn test_record_first_run() {
        let mut record = WeatherRecord::default();
        assert!(record.is_first_run());
        record.last_call = Some(1_700_000_000);
        assert!(!record.is_first_run());
    }

    #[test]
    fn test_record_round_trip_uses_legacy_field_names() {
        let record = WeatherRecord {
            location: Some(Coordinates {
                latitude: 48.85,
                longitude: 2.35,
            }),
            last_call: Some(1_700_000_000),
            more_info: MoreInfoMode::Yahoo,
            ..WeatherRecord::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ccode"], "FR");
        assert_eq!(json["lastCall"], 1_700_000_000);
        assert_eq!(json["moreinfo"], "yhw");
        assert_eq!(json["location"][0], 48.85);

        let back: WeatherRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_accepts_empty_location_array() {
        let json = serde_json::json!({
            "unit": "imperial",
            "city": "Lyon",
            "ccode": "FR",
            "location": [],
        });
        let record: WeatherRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.unit, Unit::Imperial);
        assert!(record.location.is_none());
    }

    #[test]
    fn test_hide_flags_disable_widget() {
        let both = HideFlags {
            weather_description: true,
            weather_icon: true,
        };
        assert!(both.widget_disabled());

        let one = HideFlags {
            weather_description: true,
            weather_icon: false,
        };
        assert!(!one.widget_disabled());
    }
}
