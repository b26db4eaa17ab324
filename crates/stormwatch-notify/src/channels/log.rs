use crate::format::render_alert;
use crate::NotificationChannel;
use anyhow::Result;
use async_trait::async_trait;
use stormwatch_common::types::TriggeredAlert;

/// Delivery through the process log. Always available; serves as the
/// fallback when no external channel is configured.
pub struct LogChannel {
    units: String,
}

impl LogChannel {
    pub fn new(units: &str) -> Self {
        Self {
            units: units.to_string(),
        }
    }
}

#[async_trait]
impl NotificationChannel for LogChannel {
    async fn send(&self, alert: &TriggeredAlert) -> Result<()> {
        tracing::info!(
            location = %alert.location,
            title = %alert.message,
            detail = %render_alert(alert, &self.units),
            "Weather alert"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}
