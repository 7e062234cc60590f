//! Persisted key-value store for the widget.
//!
//! The store holds two keys, `weather` and `hide`, in a single JSON
//! document. The on-disk shape matches the legacy persisted record, so an
//! existing store file keeps working.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::types::{HideFlags, WeatherRecord};

/// Partial view of the persisted document: the two keys this module uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<HideFlags>,
}

/// Storage collaborator: get-by-keys and set, nothing more.
pub trait Store {
    fn get(&self) -> Result<SyncState, StoreError>;
    fn set_weather(&self, record: &WeatherRecord) -> Result<(), StoreError>;
    fn set_hide(&self, hide: HideFlags) -> Result<(), StoreError>;
}

/// JSON-file-backed store, write-through with an in-memory copy.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<SyncState>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            SyncState::default()
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn flush(&self, state: &SyncState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn get(&self) -> Result<SyncState, StoreError> {
        Ok(self.state.lock().clone())
    }

    fn set_weather(&self, record: &WeatherRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.weather = Some(record.clone());
        self.flush(&state)
    }

    fn set_hide(&self, hide: HideFlags) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.hide = Some(hide);
        self.flush(&state)
    }
}
