use anyhow::{Context, Result};
use tokio::sync::mpsc;

use nimbus_core::Config;
use nimbus_weather::dom::{settings_patches, widget_patches};
use nimbus_weather::locate::IpLocator;
use nimbus_weather::{
    AssumeOnline, JsonFileStore, OwmClient, RefreshTask, SystemLocator, WeatherService,
};

#[tokio::main]
async fn main() -> Result<()> {
    nimbus_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    tracing::info!("Nimbus started");

    let store = JsonFileStore::open(config.weather.effective_store_path(&config.config_dir))
        .context("Failed to open the weather store")?;
    let provider = OwmClient::new(config.weather.api_keys.clone())
        .context("Failed to build the weather client")?;
    let ip_locator = IpLocator::new().context("Failed to build the IP locator")?;
    let service = WeatherService::new(
        store,
        provider,
        ip_locator,
        SystemLocator,
        AssumeOnline,
        config.weather.language.clone(),
    );

    let (tx, mut rx) = mpsc::channel(4);
    let task = RefreshTask::spawn(service, tx);

    let render_loop = async {
        while let Some(outcome) = rx.recv().await {
            for patch in widget_patches(outcome.view.as_ref()) {
                tracing::info!("Widget patch: {:?}", patch);
            }
            if let Some(update) = outcome.settings {
                tokio::time::sleep(update.delay).await;
                for patch in settings_patches(&update.view) {
                    tracing::info!("Settings patch: {:?}", patch);
                }
            }
        }
    };

    tokio::select! {
        _ = render_loop => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    task.shutdown().await;

    Ok(())
}
