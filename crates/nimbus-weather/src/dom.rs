//! Thin DOM adapter: turns view values into patch operations against the
//! widget's fixed element IDs. This is the only part of the crate that knows
//! the page structure; everything upstream deals in plain values.

use crate::render::WidgetView;
use crate::types::{MoreInfoMode, WeatherRecord};

pub mod ids {
    pub const CURRENT: &str = "current";
    pub const FORECAST: &str = "forecast";
    pub const TEMP_CONTAINER: &str = "tempContainer";
    pub const WEATHER: &str = "weather";
    pub const WEATHER_ICON: &str = "weather-icon";
    pub const CITY_INPUT: &str = "i_city";
    pub const COUNTRY_INPUT: &str = "i_ccode";
    pub const GEOL_CHECKBOX: &str = "i_geol";
    pub const CITY_SETTING: &str = "sett_city";
    pub const SETTINGS: &str = "settings";
    pub const WEATHER_PROVIDER: &str = "weather_provider";
}

/// One DOM mutation. Applying a list of these is the only side effect the
/// renderer output has on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomPatch {
    SetText {
        id: &'static str,
        text: String,
    },
    SetAttr {
        id: &'static str,
        name: &'static str,
        value: String,
    },
    RemoveAttr {
        id: &'static str,
        name: &'static str,
    },
    ToggleClass {
        id: &'static str,
        class: &'static str,
        on: bool,
    },
    SetChecked {
        id: &'static str,
        checked: bool,
    },
}

/// Patches for the widget surface. Empty when there is nothing to render
/// yet (first run before any fetch).
pub fn widget_patches(view: Option<&WidgetView>) -> Vec<DomPatch> {
    let Some(view) = view else {
        return Vec::new();
    };

    let mut patches = vec![
        DomPatch::SetText {
            id: ids::CURRENT,
            text: view.description.clone(),
        },
        DomPatch::SetText {
            id: ids::TEMP_CONTAINER,
            text: view.temp_badge.clone(),
        },
        DomPatch::SetAttr {
            id: ids::WEATHER_ICON,
            name: "src",
            value: view.icon_path.clone(),
        },
    ];

    if let Some(line) = &view.forecast_line {
        patches.push(DomPatch::SetText {
            id: ids::FORECAST,
            text: line.clone(),
        });
        patches.push(DomPatch::ToggleClass {
            id: ids::FORECAST,
            class: "wait",
            on: false,
        });
    }
    patches.push(DomPatch::ToggleClass {
        id: ids::FORECAST,
        class: "shown",
        on: view.forecast_visible,
    });

    match &view.more_info_url {
        Some(url) => patches.push(DomPatch::SetAttr {
            id: ids::WEATHER,
            name: "href",
            value: url.clone(),
        }),
        None => patches.push(DomPatch::RemoveAttr {
            id: ids::WEATHER,
            name: "href",
        }),
    }

    patches.push(DomPatch::ToggleClass {
        id: ids::CURRENT,
        class: "wait",
        on: false,
    });
    patches.push(DomPatch::ToggleClass {
        id: ids::TEMP_CONTAINER,
        class: "wait",
        on: false,
    });

    patches
}

/// Settings-panel state derived from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub city_placeholder: String,
    pub country_value: String,
    pub geolocation_checked: bool,
    pub manual_city_hidden: bool,
    pub custom_provider_shown: bool,
}

/// Project the record onto the settings panel.
pub fn settings_view(record: &WeatherRecord) -> SettingsView {
    SettingsView {
        city_placeholder: record.city.clone(),
        country_value: record.country_code.clone(),
        geolocation_checked: record.is_geolocated(),
        manual_city_hidden: record.is_geolocated(),
        custom_provider_shown: record.more_info == MoreInfoMode::Custom,
    }
}

/// Patches for the settings panel inputs.
pub fn settings_patches(view: &SettingsView) -> Vec<DomPatch> {
    vec![
        DomPatch::SetAttr {
            id: ids::CITY_INPUT,
            name: "placeholder",
            value: view.city_placeholder.clone(),
        },
        DomPatch::SetAttr {
            id: ids::COUNTRY_INPUT,
            name: "value",
            value: view.country_value.clone(),
        },
        DomPatch::SetChecked {
            id: ids::GEOL_CHECKBOX,
            checked: view.geolocation_checked,
        },
        DomPatch::ToggleClass {
            id: ids::CITY_SETTING,
            class: "hidden",
            on: view.manual_city_hidden,
        },
        DomPatch::ToggleClass {
            id: ids::WEATHER_PROVIDER,
            class: "shown",
            on: view.custom_provider_shown,
        },
    ]
}
