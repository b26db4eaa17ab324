//! Notification delivery for fired alerts.
//!
//! Each [`NotificationChannel`] implementation delivers a
//! [`stormwatch_common::types::TriggeredAlert`] somewhere: the process log,
//! a webhook endpoint. The [`manager::NotificationManager`] fans one alert
//! out to every configured channel and isolates channel failures from each
//! other.

pub mod channels;
pub mod format;
pub mod manager;

#[cfg(test)]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use stormwatch_common::types::TriggeredAlert;

/// A notification delivery channel.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Delivers the alert through this channel.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails after retries (if applicable).
    async fn send(&self, alert: &TriggeredAlert) -> Result<()>;

    /// Returns the channel name (e.g., `"log"`, `"webhook"`).
    fn channel_name(&self) -> &str;
}
