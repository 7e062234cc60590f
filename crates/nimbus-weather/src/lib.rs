//! Weather widget engine for Nimbus
//!
//! Fetches current conditions and the daily forecast from OpenWeatherMap,
//! caches them with a 30-minute TTL, applies settings events and projects
//! the cached record onto widget view values and DOM patches.

pub mod dom;
pub mod error;
pub mod lang;
pub mod locate;
pub mod provider;
pub mod refresh;
pub mod render;
pub mod scheduler;
pub mod service;
pub mod settings;
pub mod store;
pub mod types;

pub use error::{GeolocationError, StoreError, WeatherError};
pub use locate::{Geolocator, IpLocator, SystemLocator};
pub use provider::OwmClient;
pub use refresh::{RefreshDecision, REFRESH_TTL_SECS, TICK_INTERVAL_SECS};
pub use render::{render, WidgetView};
pub use scheduler::RefreshTask;
pub use service::{
    AssumeOnline, Connectivity, DispatchOutcome, RenderOutcome, WeatherService,
};
pub use settings::SettingsEvent;
pub use store::{JsonFileStore, Store, SyncState};
pub use types::{WeatherRecord, Unit};
