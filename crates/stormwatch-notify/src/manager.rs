use crate::NotificationChannel;
use stormwatch_common::types::TriggeredAlert;

/// Fans one fired alert out to every configured channel.
pub struct NotificationManager {
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl NotificationManager {
    pub fn new(channels: Vec<Box<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// Delivers `alert` through each channel in turn. A failing channel is
    /// logged and does not affect the others. Returns the number of
    /// successful deliveries.
    pub async fn notify(&self, alert: &TriggeredAlert) -> usize {
        let mut delivered = 0;
        for channel in &self.channels {
            match channel.send(alert).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::error!(
                        channel = channel.channel_name(),
                        location = %alert.location,
                        error = %e,
                        "Notification delivery failed"
                    );
                }
            }
        }
        delivered
    }
}
