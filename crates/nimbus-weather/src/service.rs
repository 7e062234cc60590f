//! Widget orchestration: one entry point for the periodic policy pass and
//! one for user settings events. All remote calls and store accesses are
//! awaited sequentially within a single logical turn; failures on the fetch
//! path silently keep the last known good state.

use chrono::{DateTime, FixedOffset};
use std::time::Duration;

use crate::dom::SettingsView;
use crate::error::WeatherError;
use crate::lang::Phrases;
use crate::locate::{Geolocator, IpLocator};
use crate::provider::OwmClient;
use crate::refresh::{
    evaluate, RefreshDecision, GEOL_REVERT_DELAY_MS, SETTINGS_POPULATE_DELAY_MS,
};
use crate::render::{render, WidgetView};
use crate::settings::{
    apply_observation, set_city, set_forecast_mode, set_location, set_more_info,
    set_provider_url, set_temperature_display, set_unit, valid_city_input, SettingsEvent,
};
use crate::store::Store;
use crate::types::WeatherRecord;

/// Network availability probe.
pub trait Connectivity {
    fn is_online(&self) -> bool;
}

/// Production default: no portable equivalent of `navigator.onLine` exists,
/// so fetches are attempted and transport failures fall back to the cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeOnline;

impl Connectivity for AssumeOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Settings-panel update to apply after `delay` (lets the page DOM settle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub view: SettingsView,
    pub delay: Duration,
}

/// Result of a policy pass or an applied settings event.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    /// `None` until a first fetch has populated the record.
    pub view: Option<WidgetView>,
    pub settings: Option<SettingsUpdate>,
}

/// Result of dispatching a settings event.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Record mutated, persisted and re-rendered.
    Applied(RenderOutcome),
    /// Early abort: invalid input or missing prerequisites, nothing changed.
    Rejected,
    /// Geolocation was refused: no mutation; the UI reverts the checkbox
    /// after the given delay.
    GeolocationDenied { revert_delay: Duration },
    /// Nothing to do.
    NoOp,
}

/// The weather widget service.
pub struct WeatherService<S, G, C> {
    store: S,
    provider: OwmClient,
    ip_locator: IpLocator,
    geolocator: G,
    connectivity: C,
    language: String,
    locale_changed: bool,
}

impl<S: Store, G: Geolocator, C: Connectivity> WeatherService<S, G, C> {
    pub fn new(
        store: S,
        provider: OwmClient,
        ip_locator: IpLocator,
        geolocator: G,
        connectivity: C,
        language: impl Into<String>,
    ) -> Self {
        Self {
            store,
            provider,
            ip_locator,
            geolocator,
            connectivity,
            language: language.into(),
            locale_changed: false,
        }
    }

    /// Flag a UI language change; the next policy pass re-fetches so the
    /// description text matches the new locale.
    pub fn set_locale_changed(&mut self) {
        self.locale_changed = true;
    }

    fn phrases(&self) -> Phrases {
        Phrases::for_tag(&self.language)
    }

    /// One policy pass: bootstrap on first run, fetch when stale, otherwise
    /// render from cache. Returns `None` when the widget is fully hidden.
    pub async fn tick(
        &mut self,
        now: DateTime<FixedOffset>,
    ) -> Result<Option<RenderOutcome>, WeatherError> {
        let state = self.store.get()?;

        if state.hide.unwrap_or_default().widget_disabled() {
            return Ok(None);
        }

        let record = state.weather.unwrap_or_default();
        self.refresh_pass(record, now).await.map(Some)
    }

    /// The policy body shared by `tick` and the unhide event.
    async fn refresh_pass(
        &mut self,
        record: WeatherRecord,
        now: DateTime<FixedOffset>,
    ) -> Result<RenderOutcome, WeatherError> {
        let online = self.connectivity.is_online();

        match evaluate(&record, now.timestamp(), online, self.locale_changed) {
            RefreshDecision::Bootstrap => self.bootstrap(record, now).await,
            RefreshDecision::Fetch => {
                self.locale_changed = false;
                let record = self.try_fetch(record, now).await;
                self.store.set_weather(&record)?;
                Ok(RenderOutcome {
                    view: render(&record, &self.phrases(), now),
                    settings: None,
                })
            }
            RefreshDecision::UseCache => Ok(RenderOutcome {
                view: render(&record, &self.phrases(), now),
                settings: None,
            }),
        }
    }

    /// First-run flow: geolocation if granted, IP lookup always (display
    /// city is cosmetic, coordinates win for requests), then fetch, persist
    /// and render. The settings panel is populated after a short delay.
    async fn bootstrap(
        &mut self,
        record: WeatherRecord,
        now: DateTime<FixedOffset>,
    ) -> Result<RenderOutcome, WeatherError> {
        let granted = match self.geolocator.position().await {
            Ok(coords) => Some(coords),
            Err(e) => {
                tracing::debug!("Geolocation unavailable at bootstrap: {}", e);
                None
            }
        };

        let mut record = record;
        if let Some(ip) = self.ip_locator.lookup().await {
            record.city = ip.city;
            record.country_code = ip.country;
            record.location = Some(ip.coordinates);
        }
        if let Some(coords) = granted {
            record.location = Some(coords);
        }

        let record = self.try_fetch(record, now).await;
        self.store.set_weather(&record)?;

        let settings = SettingsUpdate {
            view: SettingsView {
                city_placeholder: record.city.clone(),
                country_value: record.country_code.clone(),
                // The checkbox reflects an actual geolocation grant, not the
                // IP-derived coordinates.
                geolocation_checked: granted.is_some(),
                manual_city_hidden: granted.is_some(),
                custom_provider_shown: false,
            },
            delay: Duration::from_millis(SETTINGS_POPULATE_DELAY_MS),
        };

        Ok(RenderOutcome {
            view: render(&record, &self.phrases(), now),
            settings: Some(settings),
        })
    }

    /// Fetch and fold into the record; any failure keeps the input unchanged.
    async fn try_fetch(
        &self,
        record: WeatherRecord,
        now: DateTime<FixedOffset>,
    ) -> WeatherRecord {
        if !self.connectivity.is_online() {
            tracing::debug!("Network offline, keeping cached conditions");
            return record;
        }

        match self.provider.fetch(&record, &self.language, now).await {
            Ok(observation) => apply_observation(&record, observation, now.timestamp()),
            Err(e) => {
                tracing::warn!("Weather fetch failed, keeping cache: {}", e);
                record
            }
        }
    }

    /// Apply one settings event. Persists and re-renders on every branch
    /// except the documented early aborts.
    pub async fn dispatch(
        &mut self,
        event: SettingsEvent,
        now: DateTime<FixedOffset>,
    ) -> Result<DispatchOutcome, WeatherError> {
        let state = self.store.get()?;
        let Some(record) = state.weather else {
            return Ok(DispatchOutcome::Rejected);
        };
        let hide = state.hide.unwrap_or_default();

        let outcome = match event {
            SettingsEvent::Units { imperial } => {
                let record = self.try_fetch(set_unit(&record, imperial), now).await;
                self.persist_and_render(record, None, now)?
            }

            SettingsEvent::City { city, country_code } => {
                if !valid_city_input(&city) || !self.connectivity.is_online() {
                    return Ok(DispatchOutcome::Rejected);
                }
                let record = self
                    .try_fetch(set_city(&record, &city, &country_code), now)
                    .await;
                let settings = settings_update_now(&record, false);
                self.persist_and_render(record, Some(settings), now)?
            }

            SettingsEvent::Geolocation { enabled: true } => match self.geolocator.position().await
            {
                Ok(coords) => {
                    let record = self
                        .try_fetch(set_location(&record, Some(coords)), now)
                        .await;
                    let settings = settings_update_now(&record, true);
                    self.persist_and_render(record, Some(settings), now)?
                }
                Err(e) => {
                    tracing::debug!("Geolocation refused: {}", e);
                    return Ok(DispatchOutcome::GeolocationDenied {
                        revert_delay: Duration::from_millis(GEOL_REVERT_DELAY_MS),
                    });
                }
            },

            SettingsEvent::Geolocation { enabled: false } => {
                let record = self.try_fetch(set_location(&record, None), now).await;
                let settings = settings_update_now(&record, false);
                self.persist_and_render(record, Some(settings), now)?
            }

            SettingsEvent::Forecast(mode) => {
                self.persist_and_render(set_forecast_mode(&record, mode), None, now)?
            }

            SettingsEvent::Temperature(display) => {
                self.persist_and_render(set_temperature_display(&record, display), None, now)?
            }

            SettingsEvent::MoreInfo(mode) => {
                let record = set_more_info(&record, mode);
                let settings = settings_update_now(&record, record.is_geolocated());
                self.persist_and_render(record, Some(settings), now)?
            }

            SettingsEvent::Provider(url) => {
                self.persist_and_render(set_provider_url(&record, &url), None, now)?
            }

            SettingsEvent::Unhide => {
                if !hide.widget_disabled() {
                    return Ok(DispatchOutcome::NoOp);
                }
                // Both fields are becoming visible again: re-run the policy.
                let outcome = self.refresh_pass(record, now).await?;
                return Ok(DispatchOutcome::Applied(outcome));
            }
        };

        Ok(outcome)
    }

    fn persist_and_render(
        &self,
        record: WeatherRecord,
        settings: Option<SettingsUpdate>,
        now: DateTime<FixedOffset>,
    ) -> Result<DispatchOutcome, WeatherError> {
        self.store.set_weather(&record)?;
        Ok(DispatchOutcome::Applied(RenderOutcome {
            view: render(&record, &self.phrases(), now),
            settings,
        }))
    }
}

fn settings_update_now(record: &WeatherRecord, manual_city_hidden: bool) -> SettingsUpdate {
    SettingsUpdate {
        view: SettingsView {
            city_placeholder: record.city.clone(),
            country_value: record.country_code.clone(),
            geolocation_checked: record.is_geolocated(),
            manual_city_hidden,
            custom_provider_shown: record.more_info == crate::types::MoreInfoMode::Custom,
        },
        delay: Duration::ZERO,
    }
}
