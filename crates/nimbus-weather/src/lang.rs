//! Language handling for the widget: the OpenWeatherMap `lang` query
//! parameter and the handful of phrases the rendered lines are built from.

/// Map a UI language tag to the code OpenWeatherMap expects.
/// Traditional Chinese is `zh_TW` there, Greek is `el`.
pub fn api_lang(tag: &str) -> &str {
    match tag {
        "zh_HK" => "zh_TW",
        "gr" => "el",
        other => other,
    }
}

/// Phrases used by the renderer. A locale whose forecast phrase does not
/// vary by day leaves `today`/`tomorrow` empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrases {
    pub it_is_currently: &'static str,
    pub it_currently_feels_like: &'static str,
    pub feels_like: &'static str,
    pub with_a_high_of: &'static str,
    pub today: &'static str,
    pub tomorrow: &'static str,
}

pub const ENGLISH: Phrases = Phrases {
    it_is_currently: "It is currently",
    it_currently_feels_like: "It currently feels like",
    feels_like: "feels like",
    with_a_high_of: "with a high of",
    today: "today",
    tomorrow: "tomorrow",
};

const FRENCH: Phrases = Phrases {
    it_is_currently: "Il fait actuellement",
    it_currently_feels_like: "Le ressenti actuel est de",
    feels_like: "ressenti",
    with_a_high_of: "avec un maximum de",
    today: "aujourd'hui",
    tomorrow: "demain",
};

const GERMAN: Phrases = Phrases {
    it_is_currently: "Aktuell sind es",
    it_currently_feels_like: "Gefühlt sind es aktuell",
    feels_like: "gefühlt",
    with_a_high_of: "mit einem Höchstwert von",
    today: "heute",
    tomorrow: "morgen",
};

impl Phrases {
    /// Look up phrases for a language tag, falling back to English.
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "fr" => FRENCH,
            "de" => GERMAN,
            _ => ENGLISH,
        }
    }
}
