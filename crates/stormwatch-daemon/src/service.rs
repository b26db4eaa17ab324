use crate::config::AppConfig;
use anyhow::Result;
use std::path::Path;
use stormwatch_alert::config::RuleSet;
use stormwatch_alert::engine::AlertEngine;
use stormwatch_notify::channels::log::LogChannel;
use stormwatch_notify::channels::webhook::WebhookChannel;
use stormwatch_notify::manager::NotificationManager;
use stormwatch_notify::NotificationChannel;
use stormwatch_storage::engine::SqliteArchive;
use stormwatch_storage::WeatherArchive;
use stormwatch_weather::{provider_for, WeatherProvider};
use tokio::time::{interval, Duration};

/// The wired-up service: provider, archive, notifier, and the alert engine.
pub struct Service {
    config_path: String,
    provider: Box<dyn WeatherProvider>,
    archive: Box<dyn WeatherArchive>,
    notifier: NotificationManager,
    engine: AlertEngine,
}

impl Service {
    /// Builds every component from the config document. Any failure here is
    /// fatal at startup.
    pub fn init(config_path: &str) -> Result<Self> {
        let config = AppConfig::load(config_path)?;

        let provider = provider_for(&config.api)?;
        let archive: Box<dyn WeatherArchive> =
            Box::new(SqliteArchive::new(Path::new(&config.storage.path))?);

        let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();
        if config.notifications.log.enabled {
            channels.push(Box::new(LogChannel::new(&config.api.units)));
        }
        if config.notifications.webhook.enabled && !config.notifications.webhook.urls.is_empty() {
            channels.push(Box::new(WebhookChannel::new(
                config.notifications.webhook.urls.clone(),
                config.notifications.webhook.body_template.clone(),
            )));
        }
        if channels.is_empty() {
            tracing::warn!("No notification channels enabled; alerts will only be archived");
        }

        tracing::info!(
            provider = provider.name(),
            locations = config.rules.locations.len(),
            channels = channels.len(),
            "Service initialized"
        );

        Ok(Self {
            config_path: config_path.to_string(),
            provider,
            archive,
            notifier: NotificationManager::new(channels),
            engine: AlertEngine::new(config.rules),
        })
    }

    /// One pass over all configured locations. Per-location failures are
    /// logged and do not abort the pass.
    pub async fn check_all(&self) {
        let rules = self.engine.rules();

        for location in &rules.locations {
            tracing::info!(location = %location.name, "Checking weather");

            let snapshot = match self
                .provider
                .current(location.latitude, location.longitude)
                .await
            {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::error!(location = %location.name, error = %e, "Weather fetch failed");
                    continue;
                }
            };

            if let Err(e) = self.archive.store_snapshot(&location.name, &snapshot) {
                tracing::error!(location = %location.name, error = %e, "Failed to archive snapshot");
            }

            let alerts = self.engine.evaluate(&location.name, &snapshot);
            for alert in &alerts {
                self.notifier.notify(alert).await;
                if let Err(e) = self.archive.store_alert(alert) {
                    tracing::error!(location = %alert.location, error = %e, "Failed to archive alert");
                }
            }

            if alerts.is_empty() {
                tracing::debug!(location = %location.name, "No alerts triggered");
            } else {
                tracing::info!(
                    location = %location.name,
                    count = alerts.len(),
                    "Alerts delivered"
                );
            }
        }

        if let Err(e) = self.archive.cleanup(rules.preferences.history_days) {
            tracing::warn!(error = %e, "Archive cleanup failed");
        }
    }

    /// Re-reads the rule set from disk and swaps it into the engine. A
    /// failed reload keeps the current rules running.
    fn reload_rules(&self) {
        match RuleSet::load(&self.config_path) {
            Ok(rules) => {
                self.engine.refresh(rules);
                tracing::info!("Rule configuration reloaded");
            }
            Err(e) => {
                tracing::error!(error = %e, "Rule reload failed, keeping current rules");
            }
        }
    }
}

/// The continuous service loop: check on an interval, reload rules on
/// SIGHUP, stop on Ctrl-C.
pub async fn run(config_path: &str) -> Result<()> {
    let service = Service::init(config_path)?;

    let minutes = service.engine.rules().preferences.check_interval_minutes;
    tracing::info!(interval_minutes = minutes, "Starting stormwatch service");

    let mut tick = interval(Duration::from_secs(minutes.max(1) * 60));

    loop {
        tokio::select! {
            _ = tick.tick() => service.check_all().await,
            _ = reload_signal() => service.reload_rules(),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Service stopped by user");
                break;
            }
        }
    }

    Ok(())
}

/// Resolves when a reload is requested (SIGHUP). Pends forever on platforms
/// without unix signals.
async fn reload_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut hangup) = signal(SignalKind::hangup()) {
            hangup.recv().await;
            return;
        }
    }
    std::future::pending::<()>().await
}
