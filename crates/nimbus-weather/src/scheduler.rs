//! Background refresh task: re-runs the widget policy on a fixed timer
//! until cancelled.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::locate::Geolocator;
use crate::refresh::TICK_INTERVAL_SECS;
use crate::service::{Connectivity, RenderOutcome, WeatherService};
use crate::store::Store;

/// Handle to the spawned refresh loop.
pub struct RefreshTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Spawn the loop with the standard five-minute period. The first pass
    /// runs immediately; each outcome is sent on `tx`.
    pub fn spawn<S, G, C>(
        service: WeatherService<S, G, C>,
        tx: mpsc::Sender<RenderOutcome>,
    ) -> Self
    where
        S: Store + Send + Sync + 'static,
        G: Geolocator + Send + Sync + 'static,
        C: Connectivity + Send + Sync + 'static,
    {
        Self::spawn_with_period(service, tx, Duration::from_secs(TICK_INTERVAL_SECS))
    }

    pub fn spawn_with_period<S, G, C>(
        mut service: WeatherService<S, G, C>,
        tx: mpsc::Sender<RenderOutcome>,
        period: Duration,
    ) -> Self
    where
        S: Store + Send + Sync + 'static,
        G: Geolocator + Send + Sync + 'static,
        C: Connectivity + Send + Sync + 'static,
    {
        let token = CancellationToken::new();
        let loop_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => {
                        tracing::debug!("Refresh task cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let now = chrono::Local::now().fixed_offset();
                        match service.tick(now).await {
                            Ok(Some(outcome)) => {
                                if tx.send(outcome).await.is_err() {
                                    tracing::debug!("Render channel closed, stopping refresh task");
                                    break;
                                }
                            }
                            Ok(None) => {
                                tracing::debug!("Widget hidden, skipping refresh pass");
                            }
                            Err(e) => {
                                tracing::warn!("Refresh pass failed: {}", e);
                            }
                        }
                    }
                }
            }
        });

        Self { token, handle }
    }

    /// Stop the loop and wait for it to finish.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!("Refresh task did not shut down cleanly: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeolocationError;
    use crate::locate::IpLocator;
    use crate::provider::OwmClient;
    use crate::store::testing::MemoryStore;
    use crate::store::SyncState;
    use crate::types::{ConditionsSnapshot, Coordinates, HideFlags, WeatherRecord};

    struct Denied;
    impl Geolocator for Denied {
        async fn position(&self) -> Result<Coordinates, GeolocationError> {
            Err(GeolocationError::PermissionDenied)
        }
    }

    struct Online;
    impl Connectivity for Online {
        fn is_online(&self) -> bool {
            true
        }
    }

    fn cached_service() -> WeatherService<MemoryStore, Denied, Online> {
        let record = WeatherRecord {
            last_call: Some(chrono::Local::now().timestamp()),
            last_state: Some(ConditionsSnapshot {
                temp: 14.2,
                feels_like: 12.8,
                temp_max: 16.0,
                sunrise: 0,
                sunset: i64::MAX,
                description: "scattered clouds".to_string(),
                condition_code: 802,
            }),
            forecast_high: Some(17),
            ..WeatherRecord::default()
        };
        let store = MemoryStore::with_state(SyncState {
            weather: Some(record),
            hide: Some(HideFlags::default()),
        });
        WeatherService::new(
            store,
            OwmClient::new_with_base_url("http://127.0.0.1:1", Vec::new()),
            IpLocator::new_with_base_url("http://127.0.0.1:1"),
            Denied,
            Online,
            "en",
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_ticks_on_schedule() {
        let (tx, mut rx) = mpsc::channel(4);
        let task =
            RefreshTask::spawn_with_period(cached_service(), tx, Duration::from_secs(300));

        // Immediate first pass, then one per period.
        let first = rx.recv().await.unwrap();
        assert!(first.view.is_some());

        tokio::time::advance(Duration::from_secs(300)).await;
        assert!(rx.recv().await.is_some());

        task.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_the_loop() {
        let (tx, mut rx) = mpsc::channel(4);
        let task =
            RefreshTask::spawn_with_period(cached_service(), tx, Duration::from_secs(300));

        rx.recv().await.unwrap();
        task.shutdown().await;

        assert!(rx.recv().await.is_none());
    }
}
