//! Refresh policy: decide between bootstrap, a fresh fetch and the cache.

use crate::types::WeatherRecord;

/// Cached conditions stay valid this long.
pub const REFRESH_TTL_SECS: i64 = 1800;

/// Background timer period for re-running the policy.
pub const TICK_INTERVAL_SECS: u64 = 300;

/// Checkbox revert delay after a geolocation denial, milliseconds.
pub const GEOL_REVERT_DELAY_MS: u64 = 400;

/// Delay before populating settings-panel inputs after bootstrap,
/// milliseconds.
pub const SETTINGS_POPULATE_DELAY_MS: u64 = 150;

/// What the widget should do on this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// No fetch has ever succeeded: run the geolocation bootstrap flow.
    Bootstrap,
    /// Cache is stale (or the locale changed) and the network is up.
    Fetch,
    /// Render from the cached record only.
    UseCache,
}

/// Evaluate the policy for one pass. `now_secs` is seconds since epoch.
pub fn evaluate(
    record: &WeatherRecord,
    now_secs: i64,
    online: bool,
    locale_changed: bool,
) -> RefreshDecision {
    let Some(last_call) = record.last_call else {
        return RefreshDecision::Bootstrap;
    };

    if online && (now_secs > last_call + REFRESH_TTL_SECS || locale_changed) {
        RefreshDecision::Fetch
    } else {
        RefreshDecision::UseCache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_last_call(last_call: i64) -> WeatherRecord {
        WeatherRecord {
            last_call: Some(last_call),
            ..WeatherRecord::default()
        }
    }

    #[test]
    fn test_first_run_bootstraps() {
        let record = WeatherRecord::default();
        assert_eq!(
            evaluate(&record, 1_700_000_000, true, false),
            RefreshDecision::Bootstrap
        );
    }

    #[test]
    fn test_fresh_cache_is_used() {
        let record = record_with_last_call(1_700_000_000);
        // Exactly at the TTL boundary still counts as fresh.
        assert_eq!(
            evaluate(&record, 1_700_000_000 + REFRESH_TTL_SECS, true, false),
            RefreshDecision::UseCache
        );
    }

    #[test]
    fn test_stale_cache_fetches() {
        let record = record_with_last_call(1_700_000_000);
        assert_eq!(
            evaluate(&record, 1_700_000_000 + REFRESH_TTL_SECS + 1, true, false),
            RefreshDecision::Fetch
        );
    }

    #[test]
    fn test_locale_change_forces_fetch() {
        let record = record_with_last_call(1_700_000_000);
        assert_eq!(
            evaluate(&record, 1_700_000_001, true, true),
            RefreshDecision::Fetch
        );
    }

    #[test]
    fn test_offline_uses_cache_even_when_stale() {
        let record = record_with_last_call(1_700_000_000);
        assert_eq!(
            evaluate(&record, 1_700_000_000 + REFRESH_TTL_SECS + 1, false, false),
            RefreshDecision::UseCache
        );
        assert_eq!(
            evaluate(&record, 1_700_000_001, false, true),
            RefreshDecision::UseCache
        );
    }
}
